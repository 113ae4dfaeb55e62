//! Integration tests for white space processing and text transformation.
//!
//! [§ 4 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)

mod common;

use std::sync::Arc;

use common::{body_box, build, html_document, styles_with, summary, text_content, text_element};
use quire_css::layout::process_whitespace;
use quire_css::style::{ContentItem, ContentValue, Hyphens, PseudoElement, TextTransform, WhiteSpace};
use serde_json::json;

#[test]
fn test_spaces_collapse_across_inline_boundaries() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(p, "Hello \n ");
    let _ = text_element(&mut tree, p, "em", "   world ");
    let _ = tree.append_text(p, "\t\t!");
    let root = build(&tree, &common::default_styles(&tree));

    let p = &body_box(&root).children[0];
    assert_eq!(
        summary(p),
        json!(["Block", "p", [["Line", "p", [
            ["Text", "p", "Hello "],
            ["Inline", "em", [["Text", "em", "world "]]],
            ["Text", "p", "!"],
        ]]]])
    );
    let line = &p.children[0];
    assert!(line.children[1].children[0].flags.leading_collapsible_space);
    assert!(line.children[2].flags.leading_collapsible_space);
    assert!(!line.children[0].flags.leading_collapsible_space);
}

#[test]
fn test_white_space_between_blocks_is_dropped() {
    let (mut tree, body) = html_document();
    let _ = tree.append_text(body, "\n  ");
    let _ = text_element(&mut tree, body, "p", "a");
    let _ = tree.append_text(body, "\n");
    let _ = text_element(&mut tree, body, "p", "b");
    let root = build(&tree, &common::default_styles(&tree));

    let tags: Vec<&str> = body_box(&root).children.iter().map(|child| child.element_tag.as_str()).collect();
    assert_eq!(tags, ["p", "p"]);
}

#[test]
fn test_pre_keeps_spaces_and_normalizes_line_breaks() {
    let (mut tree, body) = html_document();
    let _ = text_element(&mut tree, body, "pre", "  a\r\n\tb  \rc");
    let root = build(&tree, &common::default_styles(&tree));

    assert_eq!(text_content(&root), "  a\n\tb  \nc");
}

#[test]
fn test_pre_line_keeps_newlines_only() {
    let (mut tree, body) = html_document();
    let _ = text_element(&mut tree, body, "p", "a   \n   b \t c");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "p" {
            style.white_space = WhiteSpace::PreLine;
        }
    });
    let root = build(&tree, &styles);

    assert_eq!(text_content(&root), "a\nb c");
}

#[test]
fn test_nowrap_collapses_newlines() {
    let (mut tree, body) = html_document();
    let _ = text_element(&mut tree, body, "p", "one\ntwo   three");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "p" {
            style.white_space = WhiteSpace::Nowrap;
        }
    });
    let root = build(&tree, &styles);

    assert_eq!(text_content(&root), "one two three");
}

#[test]
fn test_empty_text_is_removed_and_space_flag_moves_on() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(p, "a ");
    let _ = text_element(&mut tree, p, "span", "  ");
    let _ = tree.append_text(p, "b");
    let root = build(&tree, &common::default_styles(&tree));

    let line = &body_box(&root).children[0].children[0];
    let span = &line.children[1];
    assert_eq!(span.element_tag, "span");
    assert!(span.children.is_empty(), "the collapsed space is gone");
    assert!(span.flags.leading_collapsible_space);
    assert!(span.flags.trailing_collapsible_space);
    assert_eq!(text_content(line), "a b");
}

#[test]
fn test_text_transform() {
    let (mut tree, body) = html_document();
    let upper = text_element(&mut tree, body, "p", "straße");
    let capitalized = text_element(&mut tree, body, "p", "the quick-brown fox");
    let wide = text_element(&mut tree, body, "p", "a-1 b");
    let soft = text_element(&mut tree, body, "p", "hy\u{AD}phen");
    let styles = styles_with(&tree, |node, _, style| {
        if node == upper {
            style.text_transform = TextTransform::Uppercase;
        } else if node == capitalized {
            style.text_transform = TextTransform::Capitalize;
        } else if node == wide {
            style.text_transform = TextTransform::FullWidth;
        } else if node == soft {
            style.hyphens = Hyphens::None;
        }
    });
    let root = build(&tree, &styles);

    let texts: Vec<String> = body_box(&root).children.iter().map(|p| text_content(p)).collect();
    assert_eq!(
        texts,
        ["STRASSE", "The Quick-Brown Fox", "\u{FF41}\u{2212}\u{FF11}\u{3000}\u{FF42}", "hyphen"]
    );
}

#[test]
fn test_capitalize_leaves_the_rest_of_the_word_alone() {
    let (mut tree, body) = html_document();
    let _ = text_element(&mut tree, body, "p", "mIXED cASE words, iPhone");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "p" {
            style.text_transform = TextTransform::Capitalize;
        }
    });
    let root = build(&tree, &styles);

    assert_eq!(text_content(body_box(&root)), "MIXED CASE Words, IPhone");
}

#[test]
fn test_text_transform_applies_to_descendants_and_generated_text() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let _ = text_element(&mut tree, p, "span", "nested");
    let mut styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "p" {
            style.text_transform = TextTransform::Uppercase;
        }
    });
    styles.derive_pseudo(p, PseudoElement::After, |style| {
        style.content = ContentValue::Items(vec![ContentItem::String(" after".to_string())]);
    });
    let root = build(&tree, &styles);

    assert_eq!(text_content(&root), "NESTED AFTER");
}

#[test]
fn test_whitespace_processing_is_idempotent() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(p, "  Hello \n ");
    let _ = text_element(&mut tree, p, "em", "   world ");
    let _ = tree.append_text(p, "\t\t! ");
    let pre = text_element(&mut tree, body, "pre", "  keep\r\n  this  ");
    let styles = styles_with(&tree, |node, _, style| {
        if node == pre {
            style.white_space = WhiteSpace::Pre;
        }
    });
    let root = build(&tree, &styles);

    let (again, _) = process_whitespace(&root, false);
    assert!(Arc::ptr_eq(&again, &root), "a second pass should change nothing");
    let body = body_box(&again);
    assert_eq!(text_content(&body.children[0]), " Hello world ! ");
    assert_eq!(text_content(&body.children[1]), "  keep\n  this  ");
}
