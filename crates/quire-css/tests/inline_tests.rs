//! Integration tests for line boxes, block-in-inline splitting and flex items.
//!
//! [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)

mod common;

use std::sync::Arc;

use common::{body_box, build, default_styles, html_document, styles_with, summary, text_element};
use quire_css::layout::{BoxKind, LayoutBox, block_in_inline, inline_in_block};
use quire_css::style::{ComputedStyle, Display, Float, Position};
use serde_json::json;

#[test]
fn test_mixed_content_gets_anonymous_blocks() {
    let (mut tree, body) = html_document();
    let div = tree.append_element(body, "div", &[]);
    let _ = tree.append_text(div, "text");
    let _ = text_element(&mut tree, div, "p", "para");
    let _ = tree.append_text(div, "tail");
    let root = build(&tree, &default_styles(&tree));

    assert_eq!(
        summary(&body_box(&root).children[0]),
        json!(["Block", "div", [
            ["Block", "div", [["Line", "div", [["Text", "div", "text"]]]]],
            ["Block", "p", [["Line", "p", [["Text", "p", "para"]]]]],
            ["Block", "div", [["Line", "div", [["Text", "div", "tail"]]]]],
        ]])
    );
    let anonymous = &body_box(&root).children[0].children[0];
    assert!(anonymous.flags.is_anonymous);
}

#[test]
fn test_block_inside_inline_splits_the_inline() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let span = tree.append_element(p, "span", &[]);
    let _ = tree.append_text(span, "a");
    let _ = text_element(&mut tree, span, "div", "b");
    let _ = tree.append_text(span, "c");
    let root = build(&tree, &default_styles(&tree));

    assert_eq!(
        summary(&body_box(&root).children[0]),
        json!(["Block", "p", [
            ["Block", "p", [["Line", "p", [["Inline", "span", [["Text", "span", "a"]]]]]]],
            ["Block", "div", [["Line", "div", [["Text", "div", "b"]]]]],
            ["Block", "p", [["Line", "p", [["Inline", "span", [["Text", "span", "c"]]]]]]],
        ]])
    );
}

#[test]
fn test_split_in_nested_inlines() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let outer = tree.append_element(p, "em", &[]);
    let inner = tree.append_element(outer, "strong", &[]);
    let _ = tree.append_text(inner, "x");
    let _ = tree.append_element(inner, "hr", &[]);
    let _ = tree.append_element(inner, "hr", &[]);
    let _ = tree.append_text(outer, "y");
    let root = build(&tree, &default_styles(&tree));

    let p = &body_box(&root).children[0];
    let tags: Vec<(&str, &str)> = p.children.iter().map(|child| (child.kind_name(), child.element_tag.as_str())).collect();
    assert_eq!(tags, [("Block", "p"), ("Block", "hr"), ("Block", "p"), ("Block", "hr"), ("Block", "p")]);

    // Between the two rules, the split inlines are empty.
    assert_eq!(
        summary(&p.children[2]),
        json!(["Block", "p", [["Line", "p", [["Inline", "em", [["Inline", "strong", []]]]]]]])
    );
    assert_eq!(
        summary(&p.children[4]),
        json!(["Block", "p", [["Line", "p", [["Inline", "em", [["Inline", "strong", []], ["Text", "em", "y"]]]]]]])
    );
}

#[test]
fn test_floats_join_started_lines_only() {
    let (mut tree, body) = html_document();
    let leading = tree.append_element(body, "p", &[]);
    let _ = text_element(&mut tree, leading, "div", "f");
    let _ = tree.append_text(leading, "a");
    let trailing = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(trailing, "a");
    let _ = text_element(&mut tree, trailing, "div", "f");
    let _ = tree.append_text(trailing, "b");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "div" {
            style.float = Float::Left;
        }
    });
    let root = build(&tree, &styles);

    let body = body_box(&root);
    let first: Vec<&str> = body.children[0].children.iter().map(|child| child.kind_name()).collect();
    assert_eq!(first, ["Block", "Block"], "a leading float stays a block sibling");
    assert!(body.children[0].children[0].is_floated());

    let second = &body.children[1];
    assert_eq!(second.children.len(), 1);
    let line: Vec<&str> = second.children[0].children.iter().map(|child| child.kind_name()).collect();
    assert_eq!(line, ["Text", "Block", "Text"], "the float and the text share the line");
}

#[test]
fn test_absolute_boxes_do_not_split_inlines() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let span = tree.append_element(p, "span", &[]);
    let _ = tree.append_text(span, "a");
    let _ = text_element(&mut tree, span, "div", "abs");
    let _ = tree.append_text(span, "b");
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "div" {
            style.position = Position::Absolute;
        }
    });
    let root = build(&tree, &styles);

    let p = &body_box(&root).children[0];
    assert_eq!(p.children.len(), 1);
    assert!(matches!(p.children[0].kind, BoxKind::Line));
    assert_eq!(p.children[0].children[0].children.len(), 3);
}

#[test]
fn test_flex_items() {
    let (mut tree, body) = html_document();
    let flex = tree.append_element(body, "div", &[]);
    let _ = tree.append_text(flex, "  ");
    let _ = text_element(&mut tree, flex, "span", "a");
    let _ = tree.append_text(flex, "text");
    let _ = text_element(&mut tree, flex, "p", "b");
    let styles = styles_with(&tree, |node, _, style| {
        if node == flex {
            style.display = Display::flex();
        }
    });
    let root = build(&tree, &styles);

    let flex = &body_box(&root).children[0];
    assert_eq!(
        summary(flex),
        json!(["Flex", "div", [
            ["Block", "div", [["Line", "div", [["Text", "span", "a"]]]]],
            ["Block", "div", [["Line", "div", [["Text", "div", "text"]]]]],
            ["Block", "p", [["Line", "p", [["Text", "p", "b"]]]]],
        ]])
    );
    assert!(flex.children.iter().all(|item| item.flags.is_flex_item));
}

#[test]
fn test_passes_keep_unchanged_subtrees() {
    let style = Arc::new(ComputedStyle {
        display: Display::block(),
        ..ComputedStyle::default()
    });
    let text = Arc::new(LayoutBox::new(BoxKind::Text("x".to_string()), "p", None, Arc::default(), Vec::new()));
    let p = Arc::new(LayoutBox::new(BoxKind::Block, "p", None, Arc::clone(&style), vec![text]));

    let wrapped = inline_in_block(&p);
    assert!(matches!(wrapped.children[0].kind, BoxKind::Line));
    let split = block_in_inline(&wrapped);
    assert!(Arc::ptr_eq(&split, &wrapped), "nothing to split");
}

#[test]
#[should_panic(expected = "line box found")]
fn test_inline_in_block_runs_once() {
    let text = Arc::new(LayoutBox::new(BoxKind::Text("x".to_string()), "p", None, Arc::default(), Vec::new()));
    let p = Arc::new(LayoutBox::new(BoxKind::Block, "p", None, Arc::default(), vec![text]));
    let _ = inline_in_block(&inline_in_block(&p));
}
