//! The style input contract of the box tree builder.
//!
//! The builder asks a [`StyleResolver`] for the finished computed style of
//! each `(element, pseudo-element)` pair. [`StyleMap`] is a simple resolver
//! backed by a hash map, pre-filled with the HTML user agent defaults that
//! matter for box generation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use quire_dom::{DomTree, ElementData, NodeId};

use super::computed::{ComputedStyle, Sides, WhiteSpace};
use super::content::ListStyleType;
use super::display::{Display as DisplayValue, InternalDisplayType};
use super::values::LengthValue;

/// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
    /// `::marker`
    Marker,
    /// `::first-line`
    FirstLine,
    /// `::first-letter`
    FirstLetter,
}

/// Supplies computed styles to the box tree builder.
///
/// Returning `None` for an element means it has no style and generates no
/// box; for a pseudo-element it means the pseudo-element does not exist.
pub trait StyleResolver {
    /// Computed style of `node`, or of its `pseudo` pseudo-element.
    fn style_for(&self, node: NodeId, pseudo: Option<PseudoElement>) -> Option<Arc<ComputedStyle>>;
}

/// A [`StyleResolver`] backed by a map of precomputed styles.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<(NodeId, Option<PseudoElement>), Arc<ComputedStyle>>,
}

impl StyleMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the style of `node` (or one of its pseudo-elements).
    pub fn insert(&mut self, node: NodeId, pseudo: Option<PseudoElement>, style: ComputedStyle) {
        let _ = self.styles.insert((node, pseudo), Arc::new(style));
    }

    /// Compute styles for every element of `tree` in tree order.
    ///
    /// Each element starts from its parent's inherited properties, receives
    /// the user agent defaults of [`apply_user_agent_defaults`], then the
    /// `author` callback, which plays the role of the cascade.
    pub fn from_dom<F>(tree: &DomTree, author: F) -> Self
    where
        F: Fn(NodeId, &ElementData, &mut ComputedStyle),
    {
        let mut map = Self::new();
        if let Some(root) = tree.document_element() {
            map.compute_subtree(tree, root, None, &author);
        }
        map
    }

    fn compute_subtree<F>(&mut self, tree: &DomTree, node: NodeId, parent: Option<&ComputedStyle>, author: &F)
    where
        F: Fn(NodeId, &ElementData, &mut ComputedStyle),
    {
        let Some(element) = tree.as_element(node) else {
            return;
        };
        let mut style = parent.map(ComputedStyle::inherit_from).unwrap_or_default();
        apply_user_agent_defaults(element, &mut style);
        author(node, element, &mut style);

        for (child, _) in tree.element_children(node) {
            self.compute_subtree(tree, child, Some(&style), author);
        }
        self.insert(node, None, style);
    }

    /// Give `node` a `pseudo` style derived from its own style.
    ///
    /// The pseudo-element inherits from its originating element; `f`
    /// sets its own declarations.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no style yet.
    pub fn derive_pseudo(&mut self, node: NodeId, pseudo: PseudoElement, f: impl FnOnce(&mut ComputedStyle)) {
        let parent = self
            .styles
            .get(&(node, None))
            .unwrap_or_else(|| panic!("node {node:?} has no style"));
        let mut style = ComputedStyle::inherit_from(parent);
        f(&mut style);
        self.insert(node, Some(pseudo), style);
    }

    /// Mutate the stored style of `node` (or one of its pseudo-elements).
    /// Returns `false` when there is no such style.
    pub fn update(&mut self, node: NodeId, pseudo: Option<PseudoElement>, f: impl FnOnce(&mut ComputedStyle)) -> bool {
        self.styles.get_mut(&(node, pseudo)).is_some_and(|style| {
            f(Arc::make_mut(style));
            true
        })
    }
}

impl StyleResolver for StyleMap {
    fn style_for(&self, node: NodeId, pseudo: Option<PseudoElement>) -> Option<Arc<ComputedStyle>> {
        self.styles.get(&(node, pseudo)).cloned()
    }
}

/// [§ 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
///
/// The user agent declarations relevant to box generation: `display` per
/// element, list numbering, table cell padding, anchors and heading
/// bookmarks.
pub fn apply_user_agent_defaults(element: &ElementData, style: &mut ComputedStyle) {
    let tag = element.tag_name.to_ascii_lowercase();
    style.display = default_display_for_element(&tag);

    // "[id] { anchor: attr(id) }", "a[name] { anchor: attr(name) }"
    let anchor = match element.attr("id") {
        Some(id) => Some(id),
        None if tag == "a" => element.attr("name"),
        None => None,
    };
    style.anchor = anchor.filter(|name| !name.is_empty()).map(str::to_string);

    match tag.as_str() {
        // [§ 15.3.8 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists)
        // "ol, ul, menu { counter-reset: list-item; }"
        // "ol { list-style-type: decimal; }"
        "ol" => {
            style.counter_reset = vec![("list-item".to_string(), 0)];
            style.list_style_type = ListStyleType::named("decimal");
        }
        "ul" | "menu" | "dir" => {
            style.counter_reset = vec![("list-item".to_string(), 0)];
        }
        // [§ 15.3.3 Flow content]
        // "listing, plaintext, pre, xmp { white-space: pre; }"
        "listing" | "plaintext" | "pre" | "xmp" => {
            style.white_space = WhiteSpace::Pre;
        }
        // [§ 15.3.10 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2)
        // "table { ... border-collapse: separate; }" is the initial value.
        // "td, th { padding: 1px; }"
        "td" | "th" => {
            style.padding = Sides::all(LengthValue::Px(1.0));
        }
        // "h1 { bookmark-level: 1 }" through "h6 { bookmark-level: 6 }"
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            style.bookmark_level = tag[1..].parse().ok();
        }
        _ => {}
    }
}

/// [§ 15.3 Non-replaced elements](https://html.spec.whatwg.org/multipage/rendering.html#non-replaced-elements)
///
/// The default `display` of an HTML element.
#[must_use]
pub fn default_display_for_element(tag_name: &str) -> DisplayValue {
    // [§ 15.3.1 Hidden elements]
    // "The following elements must have their display set to none:"
    let hidden = [
        "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
        "param", "rp", "script", "style", "template", "title",
    ];
    if hidden.contains(&tag_name) {
        return DisplayValue::None;
    }

    // [§ 15.3.3 Flow content]
    let block_elements = [
        "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
        "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
        "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend", "listing",
        "main", "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary",
        "ul", "xmp",
    ];
    if block_elements.contains(&tag_name) {
        return DisplayValue::block();
    }

    // [§ 15.3.10 Tables]
    // "table { display: table; } caption { display: table-caption; } ..."
    let internal = match tag_name {
        "table" => return DisplayValue::table(),
        "caption" => InternalDisplayType::TableCaption,
        "colgroup" => InternalDisplayType::TableColumnGroup,
        "col" => InternalDisplayType::TableColumn,
        "thead" => InternalDisplayType::TableHeaderGroup,
        "tbody" => InternalDisplayType::TableRowGroup,
        "tfoot" => InternalDisplayType::TableFooterGroup,
        "tr" => InternalDisplayType::TableRow,
        "td" | "th" => InternalDisplayType::TableCell,
        // [§ 15.3.8 Lists] "li { display: list-item; }"
        "li" => return DisplayValue::list_item(),
        // Form controls are inline-block by default.
        "input" | "button" | "textarea" | "select" => return DisplayValue::inline_block(),
        // Everything else (a, span, em, img, ...) is inline.
        _ => return DisplayValue::inline(),
    };
    DisplayValue::Internal(internal)
}
