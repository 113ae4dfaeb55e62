//! Shared helpers for the box tree integration tests.

#![allow(dead_code)]

use quire_common::url::Url;
use quire_css::layout::{BoxRef, BuildOptions, LayoutBox, ReplacedContent, build_formatting_structure};
use quire_css::style::{ComputedStyle, StyleMap};
use quire_dom::{DomTree, ElementData, NodeId};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An `<html><body></body></html>` document. Returns the tree and the body.
pub fn html_document() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    (tree, body)
}

/// Append `<tag>text</tag>` to `parent`.
pub fn text_element(tree: &mut DomTree, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let node = tree.append_element(parent, tag, &[]);
    let _ = tree.append_text(node, text);
    node
}

/// User agent styles only.
pub fn default_styles(tree: &DomTree) -> StyleMap {
    StyleMap::from_dom(tree, |_, _, _| {})
}

/// User agent styles plus `author` for every element.
pub fn styles_with(tree: &DomTree, author: impl Fn(NodeId, &ElementData, &mut ComputedStyle)) -> StyleMap {
    StyleMap::from_dom(tree, author)
}

/// A resolver that loads nothing.
pub fn load_nothing(_url: &Url, _type_hint: Option<&str>) -> Option<ReplacedContent> {
    None
}

/// A resolver that loads every URL, keeping the type hint as MIME type.
pub fn load_everything(url: &Url, type_hint: Option<&str>) -> Option<ReplacedContent> {
    let mut content = ReplacedContent::new(url.clone());
    content.mime_type = type_hint.map(str::to_string);
    Some(content)
}

/// Build the box tree with no replaced content and no base URL.
pub fn build(tree: &DomTree, styles: &StyleMap) -> BoxRef {
    init_tracing();
    build_formatting_structure(tree, styles, &load_nothing, &BuildOptions::default())
        .expect("document should build")
}

/// The body box of a built `<html><body>` document.
pub fn body_box(root: &BoxRef) -> &BoxRef {
    assert_eq!(root.element_tag, "html");
    &root.children[0]
}

/// `[kind, tag, text]` for text boxes, `[kind, tag, [children]]` otherwise.
pub fn summary(b: &LayoutBox) -> Value {
    match b.text() {
        Some(text) => json!([b.kind_name(), b.element_tag, text]),
        None => {
            let children: Vec<Value> = b.children.iter().map(|child| summary(child)).collect();
            json!([b.kind_name(), b.element_tag, children])
        }
    }
}

/// Concatenated text of every Text box below `b`, in tree order.
pub fn text_content(b: &LayoutBox) -> String {
    b.descendants().into_iter().filter_map(LayoutBox::text).collect()
}

/// Text of every `::marker` box below `b`, in tree order.
pub fn marker_texts(b: &LayoutBox) -> Vec<String> {
    b.descendants()
        .into_iter()
        .filter(|b| b.flags.is_list_marker)
        .map(text_content)
        .collect()
}
