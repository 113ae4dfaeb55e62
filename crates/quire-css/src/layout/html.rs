//! HTML element handlers.
//!
//! [§ 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! Some elements change the box they generate based on their attributes:
//! replaced elements, table spans and attachment links. A handler gets the
//! finished box of its element and returns the boxes that replace it.

use std::sync::Arc;

use quire_common::url::{Url, UrlError, resolve_url};
use quire_common::warning::warn_once;
use quire_dom::{DomTree, ElementData, NodeId};

use super::boxes::{BoxKind, BoxRef, LayoutBox, ReplacedContent};

/// [§ 4.9.3 The colgroup element](https://html.spec.whatwg.org/multipage/tables.html#attr-colgroup-span)
///
/// "If specified, must be a valid non-negative integer greater than zero and
/// less than or equal to 1000."
const MAX_SPAN: usize = 1000;

/// [§ 4.9.11 Attributes common to td and th elements](https://html.spec.whatwg.org/multipage/tables.html#attributes-common-to-td-and-th-elements)
///
/// "The rowspan attribute ... must be a valid non-negative integer less than
/// or equal to 65534."
const MAX_ROWSPAN: usize = 65534;

/// Supplies replaced content (images, embedded documents) for URLs.
///
/// Returning `None` means the resource is unavailable; elements then fall
/// back to their alternative content.
pub trait ReplacedContentResolver {
    /// Load the resource at `url`. `type_hint` is the `type` attribute of
    /// `embed` and `object`.
    fn resolve(&self, url: &Url, type_hint: Option<&str>) -> Option<ReplacedContent>;
}

impl<F> ReplacedContentResolver for F
where
    F: Fn(&Url, Option<&str>) -> Option<ReplacedContent>,
{
    fn resolve(&self, url: &Url, type_hint: Option<&str>) -> Option<ReplacedContent> {
        self(url, type_hint)
    }
}

/// Inputs shared by every handler during one build.
pub(crate) struct HandlerContext<'a> {
    pub tree: &'a DomTree,
    pub replaced: &'a dyn ReplacedContentResolver,
    pub base_url: Option<&'a Url>,
}

impl HandlerContext<'_> {
    /// Resolve a URL attribute of `element`. A missing or empty attribute is
    /// `None`; an unresolvable one is reported and `None`.
    pub fn url_attribute(&self, element: &ElementData, name: &str) -> Option<Url> {
        self.resolve(element.attr(name)?)
    }

    /// Resolve `href` against the base URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        match resolve_url(href, self.base_url) {
            Ok(url) => Some(url),
            Err(UrlError::Empty) => None,
            Err(error) => {
                warn_once("CSS", &format!("ignored URL: {error}"));
                None
            }
        }
    }

    /// Ask the resolver for `url`, reporting failures.
    pub fn load(&self, url: &Url, type_hint: Option<&str>) -> Option<ReplacedContent> {
        let content = self.replaced.resolve(url, type_hint);
        if content.is_none() {
            warn_once("CSS", &format!("failed to load replaced content at {url}"));
        }
        content
    }
}

/// Run the handler registered for `element`'s tag, if any.
pub(crate) fn handle_element(
    ctx: &HandlerContext<'_>,
    node: NodeId,
    element: &ElementData,
    b: LayoutBox,
) -> Vec<BoxRef> {
    match element.tag_name.to_ascii_lowercase().as_str() {
        "img" => handle_img(ctx, element, b),
        "embed" => handle_embed(ctx, element, b),
        "object" => handle_object(ctx, element, b),
        "colgroup" => vec![Arc::new(handle_colgroup(ctx.tree, node, element, b))],
        "col" => handle_col(element, b),
        "td" | "th" => vec![Arc::new(handle_td(element, b))],
        "a" => vec![Arc::new(handle_a(element, b))],
        _ => vec![Arc::new(b)],
    }
}

/// The box of a replaced element: block-level when the element's outer
/// display type is block, inline-level otherwise.
fn make_replaced_box(b: &LayoutBox, content: ReplacedContent) -> BoxRef {
    let mut replaced = b.shallow_copy();
    replaced.kind = if b.style.display.is_block_outside() {
        BoxKind::BlockReplaced(content)
    } else {
        BoxKind::InlineReplaced(content)
    };
    Arc::new(replaced)
}

/// [§ 4.8.4 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
///
/// "If the src attribute is set and the alt attribute is set to a value
/// that isn't empty, the image represents some text (given by the alt
/// attribute)" when it cannot be shown.
fn handle_img(ctx: &HandlerContext<'_>, element: &ElementData, mut b: LayoutBox) -> Vec<BoxRef> {
    if let Some(content) = ctx
        .url_attribute(element, "src")
        .and_then(|src| ctx.load(&src, None))
    {
        return vec![make_replaced_box(&b, content)];
    }
    match element.attr("alt") {
        Some(alt) if !alt.is_empty() => {
            b.children = vec![Arc::new(LayoutBox::anonymous_text(&b, alt))];
            vec![Arc::new(b)]
        }
        _ => Vec::new(),
    }
}

fn type_hint(element: &ElementData) -> Option<&str> {
    element.attr("type").map(str::trim).filter(|hint| !hint.is_empty())
}

/// [§ 4.8.6 The embed element](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#the-embed-element)
///
/// The element has no fallback content.
fn handle_embed(ctx: &HandlerContext<'_>, element: &ElementData, b: LayoutBox) -> Vec<BoxRef> {
    ctx.url_attribute(element, "src")
        .and_then(|src| ctx.load(&src, type_hint(element)))
        .map(|content| make_replaced_box(&b, content))
        .into_iter()
        .collect()
}

/// [§ 4.8.7 The object element](https://html.spec.whatwg.org/multipage/iframe-embed-object.html#the-object-element)
///
/// "Otherwise ... the element's contents are its fallback content." The box
/// itself is kept with its children.
fn handle_object(ctx: &HandlerContext<'_>, element: &ElementData, b: LayoutBox) -> Vec<BoxRef> {
    let content = ctx
        .url_attribute(element, "data")
        .and_then(|data| ctx.load(&data, type_hint(element)));
    match content {
        Some(content) => vec![make_replaced_box(&b, content)],
        None => vec![Arc::new(b)],
    }
}

/// A `span`-like attribute: a positive integer, clamped to `max`.
fn span_attribute(element: &ElementData, name: &str, minimum: usize, max: usize) -> Option<usize> {
    let value = usize::try_from(element.non_negative_integer_attr(name)?).ok()?;
    (value >= minimum).then_some(value.min(max))
}

/// [§ 4.9.3 The colgroup element](https://html.spec.whatwg.org/multipage/tables.html#the-colgroup-element)
///
/// "If the colgroup element contains no col elements, then the element may
/// have a span content attribute specified". Such a group gets `span`
/// anonymous columns. A group with `col` children spans them, which the
/// table pass counts later.
fn handle_colgroup(tree: &DomTree, node: NodeId, element: &ElementData, mut b: LayoutBox) -> LayoutBox {
    let has_columns = tree
        .element_children(node)
        .any(|(_, child)| child.tag_name.eq_ignore_ascii_case("col"));
    let span = span_attribute(element, "span", 1, MAX_SPAN).unwrap_or(1);

    let BoxKind::TableColumnGroup { span: group_span, .. } = &mut b.kind else {
        return b;
    };
    if has_columns {
        *group_span = 0;
        return b;
    }
    *group_span = span;
    let columns = (0..span)
        .map(|_| Arc::new(LayoutBox::anonymous_from(&b, BoxKind::column(), Vec::new())))
        .collect();
    b.children = columns;
    b
}

/// [§ 4.9.4 The col element](https://html.spec.whatwg.org/multipage/tables.html#the-col-element)
///
/// A column spanning `n` columns becomes `n` columns spanning one.
fn handle_col(element: &ElementData, b: LayoutBox) -> Vec<BoxRef> {
    if !matches!(b.kind, BoxKind::TableColumn { .. }) {
        return vec![Arc::new(b)];
    }
    let span = span_attribute(element, "span", 1, MAX_SPAN).unwrap_or(1);
    let column = Arc::new(b);
    vec![column; span]
}

/// [§ 4.9.11](https://html.spec.whatwg.org/multipage/tables.html#attributes-common-to-td-and-th-elements)
///
/// "The td and th elements may have a colspan content attribute ... must be
/// a valid non-negative integer greater than zero and less than or equal to
/// 1000." `rowspan` may be zero, meaning the rest of the row group.
fn handle_td(element: &ElementData, mut b: LayoutBox) -> LayoutBox {
    if let BoxKind::TableCell { colspan, rowspan, .. } = &mut b.kind {
        if let Some(value) = span_attribute(element, "colspan", 1, MAX_SPAN) {
            *colspan = value;
        }
        if let Some(value) = span_attribute(element, "rowspan", 0, MAX_ROWSPAN) {
            *rowspan = value;
        }
    }
    b
}

/// [§ 4.6.7.2 Link type "attachment"](https://html.spec.whatwg.org/multipage/links.html#linkTypes)
fn handle_a(element: &ElementData, mut b: LayoutBox) -> LayoutBox {
    b.flags.is_attachment = element.has_link_type("attachment");
    b
}

/// [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
///
/// "The document base URL of a Document object is ... the frozen base URL
/// of the first base element in the Document that has an href attribute, in
/// tree order". Falls back to `fallback` when there is none or its `href`
/// does not resolve.
#[must_use]
pub fn find_base_url(tree: &DomTree, fallback: Option<&Url>) -> Option<Url> {
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        let href = tree
            .as_element(node)
            .filter(|element| element.tag_name.eq_ignore_ascii_case("base"))
            .and_then(|element| element.attr("href"));
        if let Some(href) = href {
            match resolve_url(href, fallback) {
                Ok(url) => return Some(url),
                Err(UrlError::Empty) => {}
                Err(error) => {
                    warn_once("CSS", &format!("ignored <base href>: {error}"));
                    return fallback.cloned();
                }
            }
        }
        stack.extend(tree.children(node).iter().rev());
    }
    fallback.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_attribute_bounds() {
        let element = ElementData::new("td", &[("colspan", "0"), ("rowspan", "70000"), ("span", "x")]);
        assert_eq!(span_attribute(&element, "colspan", 1, MAX_SPAN), None);
        assert_eq!(span_attribute(&element, "rowspan", 0, MAX_ROWSPAN), Some(MAX_ROWSPAN));
        assert_eq!(span_attribute(&element, "span", 1, MAX_SPAN), None);
        assert_eq!(span_attribute(&element, "missing", 1, MAX_SPAN), None);
    }
}
