//! Integration tests for counters, markers and quotes.
//!
//! [CSS Lists and Counters Level 3](https://www.w3.org/TR/css-lists-3/)

mod common;

use common::{body_box, build, default_styles, html_document, marker_texts, styles_with, summary, text_element};
use quire_css::counters::{CounterTracker, LIST_ITEM, render_marker, render_value};
use quire_css::style::{
    ComputedStyle, ContentItem, ContentValue, CounterIncrement, ListStylePosition, ListStyleType, Position,
    PseudoElement, SymbolsType,
};
use quire_dom::NodeId;
use serde_json::json;

fn list(tree: &mut quire_dom::DomTree, parent: NodeId, tag: &str, items: &[&str]) -> Vec<NodeId> {
    let list = tree.append_element(parent, tag, &[]);
    items.iter().map(|item| text_element(tree, list, "li", item)).collect()
}

#[test]
fn test_ordered_list_markers() {
    let (mut tree, body) = html_document();
    let _ = list(&mut tree, body, "ol", &["a", "b", "c"]);
    let root = build(&tree, &default_styles(&tree));

    assert_eq!(marker_texts(&root), ["1. ", "2. ", "3. "]);
}

#[test]
fn test_unordered_list_markers_are_bullets() {
    let (mut tree, body) = html_document();
    let _ = list(&mut tree, body, "ul", &["a", "b"]);
    let root = build(&tree, &default_styles(&tree));

    assert_eq!(marker_texts(&root), ["• ", "• "]);
}

#[test]
fn test_outside_marker_is_absolute_block() {
    let (mut tree, body) = html_document();
    let _ = list(&mut tree, body, "ul", &["a"]);
    let root = build(&tree, &default_styles(&tree));

    let li = &body_box(&root).children[0].children[0];
    assert_eq!(
        summary(li),
        json!(["Block", "li", [
            ["Block", "li::marker", [["Line", "li::marker", [["Text", "li::marker", "• "]]]]],
            ["Block", "li", [["Line", "li", [["Text", "li", "a"]]]]],
        ]])
    );
    let marker = &li.children[0];
    assert!(marker.flags.is_list_marker);
    assert_eq!(marker.style.position, Position::Absolute);
}

#[test]
fn test_inside_marker_joins_the_line() {
    let (mut tree, body) = html_document();
    let _ = list(&mut tree, body, "ol", &["a"]);
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "ol" {
            style.list_style_position = ListStylePosition::Inside;
        }
    });
    let root = build(&tree, &styles);

    let li = &body_box(&root).children[0].children[0];
    assert_eq!(
        summary(li),
        json!(["Block", "li", [["Line", "li", [
            ["Inline", "li::marker", [["Text", "li::marker", "1. "]]],
            ["Text", "li", "a"],
        ]]]])
    );
}

#[test]
fn test_empty_item_gets_zero_width_space() {
    let (mut tree, body) = html_document();
    let ul = tree.append_element(body, "ul", &[]);
    let _ = tree.append_element(ul, "li", &[]);
    let root = build(&tree, &default_styles(&tree));

    let li = &body_box(&root).children[0].children[0];
    assert_eq!(li.children.len(), 2);
    assert_eq!(li.children[1].children[0].children[0].text(), Some("\u{200B}"));
}

#[test]
fn test_list_style_none_and_marker_content_none() {
    let (mut tree, body) = html_document();
    let items = list(&mut tree, body, "ol", &["a", "b", "c"]);
    let mut styles = default_styles(&tree);
    let _ = styles.update(items[0], None, |style| style.list_style_type = ListStyleType::None);
    styles.derive_pseudo(items[1], PseudoElement::Marker, |style| style.content = ContentValue::None);
    let root = build(&tree, &styles);

    assert_eq!(marker_texts(&root), ["3. "], "hidden markers still count");
}

#[test]
fn test_counter_reset_value_and_roman_style() {
    let (mut tree, body) = html_document();
    let _ = list(&mut tree, body, "ol", &["a", "b"]);
    let styles = styles_with(&tree, |_, element, style| {
        if element.tag_name == "ol" {
            style.counter_reset = vec![(LIST_ITEM.to_string(), 3)];
            style.list_style_type = ListStyleType::named("lower-roman");
        }
    });
    let root = build(&tree, &styles);

    assert_eq!(marker_texts(&root), ["iv. ", "v. "]);
}

#[test]
fn test_marker_content_with_nested_counters() {
    let (mut tree, body) = html_document();
    let outer = tree.append_element(body, "ol", &[]);
    let first = text_element(&mut tree, outer, "li", "a");
    let inner = tree.append_element(first, "ol", &[]);
    let _ = text_element(&mut tree, inner, "li", "b");
    let _ = text_element(&mut tree, inner, "li", "c");
    let _ = text_element(&mut tree, outer, "li", "d");

    let mut styles = default_styles(&tree);
    let items: Vec<NodeId> = (0..tree.len())
        .map(NodeId)
        .filter(|&node| tree.as_element(node).is_some_and(|element| element.tag_name == "li"))
        .collect();
    for item in items {
        styles.derive_pseudo(item, PseudoElement::Marker, |style| {
            style.content = ContentValue::Items(vec![
                ContentItem::Counters {
                    name: LIST_ITEM.to_string(),
                    separator: ".".to_string(),
                    style: ListStyleType::named("decimal"),
                },
                ContentItem::String(") ".to_string()),
            ]);
        });
    }
    let root = build(&tree, &styles);

    assert_eq!(marker_texts(&root), ["1) ", "1.1) ", "1.2) ", "2) "]);
}

#[test]
fn test_counter_in_before_content() {
    let (mut tree, body) = html_document();
    let headings: Vec<NodeId> = ["Intro", "Usage"]
        .iter()
        .map(|title| text_element(&mut tree, body, "h2", title))
        .collect();
    let mut styles = styles_with(&tree, |_, element, style| match element.tag_name.as_str() {
        "body" => style.counter_reset = vec![("chapter".to_string(), 0)],
        "h2" => style.counter_increment = CounterIncrement::List(vec![("chapter".to_string(), 1)]),
        _ => {}
    });
    for heading in headings {
        styles.derive_pseudo(heading, PseudoElement::Before, |style| {
            style.content = ContentValue::Items(vec![
                ContentItem::String("Chapter ".to_string()),
                ContentItem::Counter {
                    name: "chapter".to_string(),
                    style: ListStyleType::named("upper-alpha"),
                },
                ContentItem::String(": ".to_string()),
            ]);
        });
    }
    let root = build(&tree, &styles);

    let body = body_box(&root);
    let before = &body.children[1].children[0].children[0];
    assert_eq!(before.element_tag, "h2::before");
    assert_eq!(common::text_content(before), "Chapter B: ");
    assert_eq!(common::text_content(body), "Chapter A: IntroChapter B: Usage");
}

#[test]
fn test_nested_quotes() {
    let (mut tree, body) = html_document();
    let p = tree.append_element(body, "p", &[]);
    let q = text_element(&mut tree, p, "q", "inner");
    let mut styles = default_styles(&tree);
    for node in [p, q] {
        styles.derive_pseudo(node, PseudoElement::Before, |style| {
            style.content = ContentValue::Items(vec![ContentItem::OpenQuote]);
        });
        styles.derive_pseudo(node, PseudoElement::After, |style| {
            style.content = ContentValue::Items(vec![ContentItem::CloseQuote]);
        });
    }
    let root = build(&tree, &styles);

    assert_eq!(common::text_content(&root), "\u{201C}\u{2018}inner\u{2019}\u{201D}");
}

#[test]
fn test_quotes_none_produces_nothing() {
    let (mut tree, body) = html_document();
    let p = text_element(&mut tree, body, "p", "x");
    let mut styles = default_styles(&tree);
    styles.derive_pseudo(p, PseudoElement::Before, |style| {
        style.quotes = Vec::new();
        style.content = ContentValue::Items(vec![ContentItem::OpenQuote, ContentItem::String("-".to_string())]);
    });
    let root = build(&tree, &styles);

    assert_eq!(common::text_content(&root), "-x");
}

#[test]
fn test_tracker_scopes() {
    let mut tracker = CounterTracker::new();
    tracker.apply_counter_reset("section", 1);
    {
        let mut scope = tracker.scope();
        scope.apply_counter_reset("section", 0);
        scope.apply_counter_increment("section", 2);
        assert_eq!(scope.current_stack("section"), [1, 2]);
        assert_eq!(scope.depth(), 2);
    }
    assert_eq!(tracker.current_stack("section"), [1]);
    assert_eq!(tracker.current_value("missing"), 0);
    assert_eq!(tracker.current_stack("missing"), [0]);

    let style = ComputedStyle {
        display: quire_css::style::Display::list_item(),
        ..ComputedStyle::default()
    };
    tracker.update_counters(&style);
    assert_eq!(tracker.current_value(LIST_ITEM), 1, "list items increment list-item");
}

#[test]
fn test_counter_styles() {
    assert_eq!(render_value(4, &ListStyleType::named("lower-roman")), "iv");
    assert_eq!(render_value(28, &ListStyleType::named("upper-alpha")), "AB");
    assert_eq!(render_value(-3, &ListStyleType::named("decimal-leading-zero")), "-3");
    assert_eq!(render_value(7, &ListStyleType::None), "");
    assert_eq!(render_marker(2, &ListStyleType::named("decimal")), "2. ");
    assert_eq!(render_marker(5, &ListStyleType::String("-> ".to_string())), "-> ");

    let symbols = ListStyleType::Symbols {
        system: SymbolsType::Cyclic,
        symbols: vec!["*".to_string(), "+".to_string()],
    };
    assert_eq!(render_marker(3, &symbols), "* ");
    // Roman numerals stop at 4999 and fall back to decimal.
    assert_eq!(render_value(5000, &ListStyleType::named("upper-roman")), "5000");
}

#[test]
fn test_symbols_list_style_types() {
    let cases: [(ListStyleType, [&str; 4]); 8] = [
        (symbols(SymbolsType::Cyclic, &["a", "b", "c"]), ["a ", "b ", "c ", "a "]),
        (symbols(SymbolsType::Symbolic, &["a", "b"]), ["a ", "b ", "aa ", "bb "]),
        (ListStyleType::Symbols {
            system: SymbolsType::default(),
            symbols: vec!["a".to_string(), "b".to_string()],
        }, ["a ", "b ", "aa ", "bb "]),
        (symbols(SymbolsType::Alphabetic, &["a", "b"]), ["a ", "b ", "aa ", "ab "]),
        (symbols(SymbolsType::Fixed, &["a", "b"]), ["a ", "b ", "3 ", "4 "]),
        (symbols(SymbolsType::Numeric, &["0", "1", "2"]), ["1 ", "2 ", "10 ", "11 "]),
        (ListStyleType::named("decimal"), ["1. ", "2. ", "3. ", "4. "]),
        (ListStyleType::String("/".to_string()), ["/", "/", "/", "/"]),
    ];
    for (list_style_type, expected) in cases {
        let (mut tree, body) = html_document();
        let _ = list(&mut tree, body, "ol", &["abc", "abc", "abc", "abc"]);
        let styles = styles_with(&tree, |_, element, style| {
            if element.tag_name == "ol" {
                style.list_style_type = list_style_type.clone();
            }
        });
        let root = build(&tree, &styles);

        assert_eq!(marker_texts(&root), expected, "for {list_style_type:?}");
    }
}

fn symbols(system: SymbolsType, symbols: &[&str]) -> ListStyleType {
    ListStyleType::Symbols {
        system,
        symbols: symbols.iter().map(|symbol| (*symbol).to_string()).collect(),
    }
}

#[test]
fn test_counter_set_across_articles() {
    let (mut tree, body) = html_document();
    let articles: [&[&str]; 6] = [&["h1"], &["h2", "h3"], &["h3"], &["h2"], &["h3", "h3"], &["h1", "h2", "h3"]];
    let mut headings = Vec::new();
    for tags in articles {
        let article = tree.append_element(body, "article", &[]);
        for tag in tags {
            headings.push((tree.append_element(article, tag, &[]), *tag));
        }
    }

    let mut styles = styles_with(&tree, |_, element, style| match element.tag_name.as_str() {
        "body" => style.counter_reset = vec![("h2".to_string(), 0), ("h3".to_string(), 4)],
        "article" => style.counter_reset = vec![("h2".to_string(), 2)],
        "h1" => style.counter_increment = CounterIncrement::List(vec![("h1".to_string(), 1)]),
        "h2" => {
            style.counter_increment = CounterIncrement::List(vec![("h2".to_string(), 1)]);
            style.counter_set = vec![("h3".to_string(), 3)];
        }
        "h3" => style.counter_increment = CounterIncrement::List(vec![("h3".to_string(), 1)]),
        _ => {}
    });
    for &(heading, tag) in &headings {
        styles.derive_pseudo(heading, PseudoElement::Before, |style| {
            style.content = ContentValue::Items(vec![ContentItem::Counter {
                name: tag.to_string(),
                style: ListStyleType::named("decimal"),
            }]);
        });
    }
    let root = build(&tree, &styles);

    let numbers: Vec<Vec<String>> = body_box(&root)
        .children
        .iter()
        .map(|article| article.children.iter().map(|heading| common::text_content(heading)).collect())
        .collect();
    assert_eq!(numbers, [
        vec!["1"],
        vec!["3", "4"],
        vec!["5"],
        vec!["3"],
        vec!["4", "5"],
        vec!["1", "3", "4"],
    ]);
}
