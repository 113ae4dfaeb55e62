//! Box tree construction.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The following sections describe the types of boxes that may be
//! generated in CSS 2.1. A box's type affects, in part, its behavior in the
//! visual formatting model."
//!
//! [`build_formatting_structure`] walks the element tree, generating one box
//! per element plus the `::marker`, `::before` and `::after` pseudo-element
//! boxes, and then runs the normalization passes that turn it into a
//! well-formed formatting structure.

use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use quire_common::url::Url;
use quire_common::warning::warn_once;
use quire_dom::{DomTree, NodeId};

use crate::counters::{CounterTracker, LIST_ITEM, render_marker, render_value};
use crate::style::{
    ComputedStyle, ContentItem, ContentValue, Direction, Display, InnerDisplayType, InternalDisplayType,
    LengthValue, ListStylePosition, ListStyleType, OuterDisplayType, Overflow, Position,
    PseudoElement, Quotes, StyleResolver, TransformFunction, WhiteSpace,
};

use super::boxes::{BoxKind, BoxRef, LayoutBox, TableData};
use super::flex::flex_boxes;
use super::html::{HandlerContext, ReplacedContentResolver, handle_element};
use super::inline::{block_in_inline, inline_in_block};
use super::table::anonymous_table_boxes;
use super::target::{TargetCollector, box_text};
use super::whitespace::{process_text_transform, process_whitespace};

/// U+200B ZERO WIDTH SPACE, given to list items whose only child is their
/// outside marker so that they get a line box.
const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Errors of [`build_formatting_structure`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// The document has no root element.
    #[error("document has no element")]
    NoDocumentElement,
    /// The style resolver has no style for the root element.
    #[error("no style for the root element")]
    MissingRootStyle,
}

/// Build configuration.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Base URL of the document, for `src`, `data` and `url()` values.
    /// See [`find_base_url`](super::html::find_base_url).
    pub base_url: Option<Url>,
}

/// A normalization pass over the whole tree.
type Pass = fn(&BoxRef) -> BoxRef;

/// The passes run after box generation, in order.
const PASSES: [(&str, Pass); 6] = [
    ("whitespace", whitespace_pass),
    ("text-transform", process_text_transform),
    ("anonymous-table", anonymous_table_boxes),
    ("flex", flex_boxes),
    ("inline-in-block", inline_in_block),
    ("block-in-inline", block_in_inline),
];

fn whitespace_pass(b: &BoxRef) -> BoxRef {
    process_whitespace(b, false).0
}

/// Build a formatting structure (box tree) from an element tree.
///
/// The root box is flagged `is_for_root_element`. If the root element
/// generates no box (`display: none`), the build is run again with the root
/// forced to `display: block` and every other element hidden.
///
/// When a `target-*()` function names an anchor that only appears later in
/// the document, the element tree is walked a second time with the anchors
/// found by the first walk.
///
/// # Errors
///
/// [`BuildError::NoDocumentElement`] when `tree` has no element, and
/// [`BuildError::MissingRootStyle`] when `styles` has no style for it.
pub fn build_formatting_structure(
    tree: &DomTree,
    styles: &dyn StyleResolver,
    replaced: &dyn ReplacedContentResolver,
    options: &BuildOptions,
) -> Result<BoxRef, BuildError> {
    let root = tree.document_element().ok_or(BuildError::NoDocumentElement)?;
    let handlers = HandlerContext {
        tree,
        replaced,
        base_url: options.base_url.as_ref(),
    };

    let mut targets = TargetCollector::new();
    let mut root_box = generate_root_box(root, styles, &handlers, &mut targets)?;
    if targets.needs_second_walk() {
        targets.start_second_walk();
        root_box = generate_root_box(root, styles, &handlers, &mut targets)?;
    }
    Arc::make_mut(&mut root_box).flags.is_for_root_element = true;

    for (name, pass) in PASSES {
        root_box = pass(&root_box);
        #[cfg(feature = "layout-trace")]
        trace!(pass = name, "box tree:\n{}", root_box.dump());
        #[cfg(not(feature = "layout-trace"))]
        trace!(pass = name, "pass done");
    }
    let root_box = set_viewport_overflow(root_box);

    debug!(boxes = root_box.descendants().len(), "formatting structure built");
    Ok(root_box)
}

/// One walk of the element tree from the root element.
fn generate_root_box(
    root: NodeId,
    styles: &dyn StyleResolver,
    handlers: &HandlerContext<'_>,
    targets: &mut TargetCollector,
) -> Result<BoxRef, BuildError> {
    let mut boxes = BoxBuilder {
        styles,
        handlers,
        targets: &mut *targets,
    }
    .element_to_box(root, &mut CounterTracker::new());
    if boxes.is_empty() {
        debug!("root element generates no box, forcing display: block");
        let forced = RootOverride { root, styles };
        boxes = BoxBuilder {
            styles: &forced,
            handlers,
            targets,
        }
        .element_to_box(root, &mut CounterTracker::new());
    }
    boxes.into_iter().next().ok_or(BuildError::MissingRootStyle)
}

/// Box kind generated for a `display` value; `None` for `display: none`.
///
/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
fn box_kind_for(display: Display) -> Option<BoxKind> {
    let kind = match display {
        Display::None => return None,
        Display::Box { outer, inner, .. } => match (outer, inner) {
            (OuterDisplayType::Block, InnerDisplayType::Flow | InnerDisplayType::FlowRoot | InnerDisplayType::Grid) => {
                BoxKind::Block
            }
            (OuterDisplayType::Inline, InnerDisplayType::Flow) => BoxKind::Inline,
            (OuterDisplayType::Inline, InnerDisplayType::FlowRoot | InnerDisplayType::Grid) => BoxKind::InlineBlock,
            (OuterDisplayType::Block, InnerDisplayType::Table) => BoxKind::Table(TableData::default()),
            (OuterDisplayType::Inline, InnerDisplayType::Table) => BoxKind::InlineTable(TableData::default()),
            (OuterDisplayType::Block, InnerDisplayType::Flex) => BoxKind::Flex,
            (OuterDisplayType::Inline, InnerDisplayType::Flex) => BoxKind::InlineFlex,
        },
        Display::Internal(internal) => match internal {
            InternalDisplayType::TableRowGroup
            | InternalDisplayType::TableHeaderGroup
            | InternalDisplayType::TableFooterGroup => BoxKind::row_group(),
            InternalDisplayType::TableRow => BoxKind::TableRow,
            InternalDisplayType::TableCell => BoxKind::cell(),
            InternalDisplayType::TableColumnGroup => BoxKind::column_group(),
            InternalDisplayType::TableColumn => BoxKind::column(),
            InternalDisplayType::TableCaption => BoxKind::TableCaption,
        },
    };
    Some(kind)
}

/// Forces the root element to `display: block` and hides everything else.
struct RootOverride<'a> {
    root: NodeId,
    styles: &'a dyn StyleResolver,
}

impl StyleResolver for RootOverride<'_> {
    fn style_for(&self, node: NodeId, pseudo: Option<PseudoElement>) -> Option<Arc<ComputedStyle>> {
        let mut style = self.styles.style_for(node, pseudo)?;
        if node != self.root {
            Arc::make_mut(&mut style).display = Display::None;
        } else if pseudo.is_none() {
            Arc::make_mut(&mut style).display = Display::block();
        }
        Some(style)
    }
}

/// State shared by one tree walk. Counters are threaded separately so that
/// their scope guards can be held across the recursion.
struct BoxBuilder<'a> {
    styles: &'a dyn StyleResolver,
    handlers: &'a HandlerContext<'a>,
    targets: &'a mut TargetCollector,
}

impl BoxBuilder<'_> {
    /// Convert an element and its children into boxes.
    ///
    /// Most of the time this is one box, but `display: none` gives none and
    /// element handlers may return several.
    ///
    /// ```text
    /// <p>Some <em>emphasised</em> text.</p>
    ///
    /// Block <p>
    ///   Text "Some "
    ///   Inline <em>
    ///     Text "emphasised"
    ///   Text " text."
    /// ```
    fn element_to_box(&mut self, node: NodeId, counters: &mut CounterTracker) -> Vec<BoxRef> {
        let tree = self.handlers.tree;
        let Some(element) = tree.as_element(node) else {
            // Comments and processing instructions generate nothing.
            return Vec::new();
        };
        let Some(style) = self.styles.style_for(node, None) else {
            warn_once("CSS", &format!("no style for <{}>, skipping it", element.tag_name));
            return Vec::new();
        };
        let Some(kind) = box_kind_for(style.display) else {
            return Vec::new();
        };
        let mut b = LayoutBox::new(kind, element.tag_name.clone(), Some(node), Arc::clone(&style), Vec::new());
        b.first_letter_style = self.styles.style_for(node, Some(PseudoElement::FirstLetter));
        b.first_line_style = self.styles.style_for(node, Some(PseudoElement::FirstLine));

        // STEP 1: Counters of this element live in its parent's scope; its
        // children get a scope of their own.
        counters.update_counters(&style);
        let mut children: Vec<BoxRef> = Vec::new();
        let mut has_marker = false;
        let mut owns_anchor = false;
        {
            let mut scope = counters.scope();

            // STEP 2: ::marker
            if style.display.is_list_item() {
                if let Some(marker) = self.marker_to_box(node, &b.element_tag, &style, &mut scope) {
                    children.push(marker);
                    has_marker = true;
                }
            }

            // STEP 3: ::before
            children.extend(self.pseudo_to_box(node, &b, PseudoElement::Before, &mut scope));

            // A target's counters are the ones after its ::before.
            if let Some(anchor) = &style.anchor {
                owns_anchor = self.targets.store_target(anchor, scope.snapshot());
            }

            // STEP 4: Children, with adjacent text nodes merged.
            for &child in tree.children(node) {
                if let Some(text) = tree.as_text(child) {
                    if text.is_empty() {
                        continue;
                    }
                    match children.last_mut() {
                        Some(last) if last.text().is_some() => {
                            if let BoxKind::Text(existing) = &mut Arc::make_mut(last).kind {
                                existing.push_str(text);
                            }
                        }
                        _ => children.push(Arc::new(LayoutBox::anonymous_text(&b, text))),
                    }
                } else {
                    children.extend(self.element_to_box(child, &mut scope));
                }
            }

            // STEP 5: ::after
            children.extend(self.pseudo_to_box(node, &b, PseudoElement::After, &mut scope));

            // STEP 6: Scopes created by this element's children stop here.
        }

        // STEP 7: [§ 3.5 list-style-position](https://www.w3.org/TR/css-lists-3/#list-style-position-outside)
        // "The size or contents of the marker box may affect the height of
        // the principal block box and/or the height of its first line box".
        // A zero-width space gives the item a line of its own.
        if has_marker && children.len() == 1 && style.list_style_position == ListStylePosition::Outside {
            children.push(Arc::new(LayoutBox::anonymous_text(&b, ZERO_WIDTH_SPACE)));
        }
        b.children = children;

        // STEP 8: Content lists of 'string-set' and 'bookmark-label', and
        // the box of a target, read the element with its white space
        // processed.
        if !style.string_set.is_empty() || style.bookmark_level.is_some() || owns_anchor {
            let (finished, _) = process_whitespace(&Arc::new(b.clone()), false);
            b.string_set = self.named_strings(&style, &finished, counters);
            if style.bookmark_level.is_some() {
                let label = self.content_list_text(&finished, &style.bookmark_label, counters);
                b.bookmark_label = Some(label.unwrap_or_default());
            }
            if let Some(anchor) = style.anchor.as_deref().filter(|_| owns_anchor) {
                self.targets.store_target_box(anchor, finished);
            }
        }

        // STEP 9: Element-specific handling (replaced elements, spans).
        handle_element(self.handlers, node, element, b)
    }

    /// [§ 2 Generated Content](https://www.w3.org/TR/css-content-3/#content-property)
    ///
    /// The box of a `::before` or `::after` pseudo-element of `node`, whose
    /// principal box is `parent`.
    fn pseudo_to_box(
        &mut self,
        node: NodeId,
        parent: &LayoutBox,
        pseudo: PseudoElement,
        counters: &mut CounterTracker,
    ) -> Option<BoxRef> {
        // Pseudo-elements with no style at all have `content: none`.
        let style = self.styles.style_for(node, Some(pseudo))?;
        let ContentValue::Items(items) = &style.content else {
            return None;
        };
        let kind = box_kind_for(style.display)?;
        let mut b = LayoutBox::new(
            kind,
            format!("{}::{pseudo}", parent.element_tag),
            Some(node),
            Arc::clone(&style),
            Vec::new(),
        );

        counters.update_counters(&style);

        let mut children = Vec::new();
        if style.display.is_list_item() {
            children.extend(self.marker_to_box(node, &parent.element_tag, &style, counters));
        }
        children.extend(self.content_to_boxes(&b, items, &style.quotes, counters));
        b.children = children;
        Some(Arc::new(b))
    }

    /// [§ 3 Markers: the ::marker pseudo-element](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    ///
    /// `parent_style` is the style of the list item, which decides the
    /// marker position.
    fn marker_to_box(
        &mut self,
        node: NodeId,
        tag: &str,
        parent_style: &ComputedStyle,
        counters: &mut CounterTracker,
    ) -> Option<BoxRef> {
        let style = self
            .styles
            .style_for(node, Some(PseudoElement::Marker))
            .unwrap_or_else(|| Arc::new(ComputedStyle::inherit_from(parent_style)));
        if style.display.is_none() {
            return None;
        }
        let template = LayoutBox::new(BoxKind::Inline, format!("{tag}::marker"), Some(node), Arc::clone(&style), Vec::new());

        // "If the content property is none, ... the ::marker pseudo-element
        // does not generate a box." `normal` falls back to the list-style
        // image or counter.
        let children = match &style.content {
            ContentValue::Items(items) => self.content_to_boxes(&template, items, &style.quotes, counters),
            ContentValue::Normal => self.default_marker_content(&template, counters),
            ContentValue::None | ContentValue::Inhibit => Vec::new(),
        };
        if children.is_empty() {
            return None;
        }

        let mut marker = if parent_style.list_style_position == ListStylePosition::Outside {
            // [§ 3.5](https://www.w3.org/TR/css-lists-3/#list-style-position-outside)
            // "the marker box is outside the principal block box". It is
            // positioned against the item and shifted by its own width.
            let mut marker = LayoutBox::anonymous_from(&template, BoxKind::Block, children);
            let translate_x = match parent_style.direction {
                Direction::Ltr => -100.0,
                Direction::Rtl => 100.0,
            };
            let marker_style = marker.style_mut();
            marker_style.position = Position::Absolute;
            marker_style.transform = vec![TransformFunction::Translate(
                LengthValue::Percent(translate_x),
                LengthValue::ZERO,
            )];
            marker
        } else {
            LayoutBox::anonymous_from(&template, BoxKind::Inline, children)
        };
        marker.flags.is_list_marker = true;
        Some(Arc::new(marker))
    }

    /// "If the computed value of 'list-style-image' is a valid image, ...
    /// the marker box contains that image. Otherwise the marker box contains
    /// the text of the 'list-style-type' counter representation."
    fn default_marker_content(&self, template: &LayoutBox, counters: &CounterTracker) -> Vec<BoxRef> {
        let image = template
            .style
            .list_style_image
            .as_deref()
            .and_then(|href| self.handlers.resolve(href))
            .and_then(|url| self.handlers.load(&url, None));
        if let Some(image) = image {
            return vec![Arc::new(LayoutBox::anonymous_from(template, BoxKind::InlineReplaced(image), Vec::new()))];
        }
        if template.style.list_style_type == ListStyleType::None {
            return Vec::new();
        }

        let text = render_marker(counters.current_value(LIST_ITEM), &template.style.list_style_type);
        let mut text_box = LayoutBox::anonymous_text(template, text);
        text_box.style_mut().white_space = WhiteSpace::PreWrap;
        vec![Arc::new(text_box)]
    }

    /// [§ 1.1 'content'](https://www.w3.org/TR/css-content-3/#content-property)
    ///
    /// Boxes for a content list: one Text box per run of textual items, and
    /// an inline replaced box per resolved `url()`.
    fn content_to_boxes(
        &mut self,
        parent: &LayoutBox,
        items: &[ContentItem],
        quotes: &Quotes,
        counters: &mut CounterTracker,
    ) -> Vec<BoxRef> {
        let mut boxes = Vec::new();
        let mut text = String::new();
        let flush = |text: &mut String, boxes: &mut Vec<BoxRef>| {
            if !text.is_empty() {
                boxes.push(Arc::new(LayoutBox::anonymous_text(parent, mem::take(text))));
            }
        };

        for item in items {
            match item {
                ContentItem::Url(href) => {
                    let content = self
                        .handlers
                        .resolve(href)
                        .and_then(|url| self.handlers.load(&url, None));
                    if let Some(content) = content {
                        flush(&mut text, &mut boxes);
                        boxes.push(Arc::new(LayoutBox::anonymous_from(
                            parent,
                            BoxKind::InlineReplaced(content),
                            Vec::new(),
                        )));
                    }
                }
                ContentItem::OpenQuote | ContentItem::CloseQuote | ContentItem::NoOpenQuote | ContentItem::NoCloseQuote => {
                    // [§ 3.2 Inserting quotes with the content property](https://www.w3.org/TR/css-content-3/#quote-values)
                    // `quotes: none` makes the quote values produce nothing.
                    if quotes.is_empty() {
                        continue;
                    }
                    let is_open = matches!(item, ContentItem::OpenQuote | ContentItem::NoOpenQuote);
                    let insert = matches!(item, ContentItem::OpenQuote | ContentItem::CloseQuote);
                    if !is_open {
                        counters.quote_depth = counters.quote_depth.saturating_sub(1);
                    }
                    if insert {
                        let (open, close) = &quotes[counters.quote_depth.min(quotes.len() - 1)];
                        text.push_str(if is_open { open } else { close });
                    }
                    if is_open {
                        counters.quote_depth += 1;
                    }
                }
                _ => text.push_str(&self.item_text(parent, item, counters).unwrap_or_default()),
            }
        }
        flush(&mut text, &mut boxes);
        boxes
    }

    /// Text of a textual content item; `None` for images, quotes and
    /// references that cannot be resolved.
    ///
    /// `source` is the box whose text `content()` copies.
    fn item_text(&mut self, source: &LayoutBox, item: &ContentItem, counters: &CounterTracker) -> Option<String> {
        let text = match item {
            ContentItem::String(value) => value.clone(),
            ContentItem::Counter {
                style: ListStyleType::None,
                ..
            }
            | ContentItem::Counters {
                style: ListStyleType::None,
                ..
            } => return None,
            ContentItem::Counter { name, style } => render_value(counters.current_value(name), style),
            ContentItem::Counters { name, separator, style } => {
                render_levels(&counters.current_stack(name), separator, style)
            }
            // Copied text is trimmed, as line breaking would at the edges.
            ContentItem::Content(extractor) => box_text(source, *extractor).trim().to_string(),
            ContentItem::NamedString(name) => {
                warn_once("CSS", &format!("'string({name})' is only allowed in page margins"));
                return None;
            }
            ContentItem::TargetCounter { anchor, name, style } => {
                let target = self.targets.lookup(anchor, false)?;
                render_value(target.counter_value(name), style)
            }
            ContentItem::TargetCounters {
                anchor,
                name,
                separator,
                style,
            } => {
                let target = self.targets.lookup(anchor, false)?;
                render_levels(&target.counter_stack(name), separator, style)
            }
            ContentItem::TargetText { anchor, extractor } => {
                let target = self.targets.lookup(anchor, true)?;
                box_text(target.target_box.as_ref()?, *extractor).trim().to_string()
            }
            ContentItem::Url(_)
            | ContentItem::OpenQuote
            | ContentItem::CloseQuote
            | ContentItem::NoOpenQuote
            | ContentItem::NoCloseQuote => return None,
        };
        Some(text)
    }

    /// Text of a content list used outside of `content`. Quotes and images
    /// produce nothing; `None` when no item produced text.
    fn content_list_text(&mut self, source: &LayoutBox, items: &[ContentItem], counters: &CounterTracker) -> Option<String> {
        let mut text: Option<String> = None;
        for item in items {
            if let Some(piece) = self.item_text(source, item, counters) {
                text.get_or_insert_with(String::new).push_str(&piece);
            }
        }
        text
    }

    /// [§ 1.1 'string-set'](https://www.w3.org/TR/css-gcpm-3/#setting-named-strings-the-string-set-pro)
    ///
    /// "The 'string-set' property contains one or more pairs, each consisting
    /// of a custom identifier (the name of the named string) followed by a
    /// content list describing how to construct the value of the named
    /// string." A name given twice keeps its last value.
    fn named_strings(
        &mut self,
        style: &ComputedStyle,
        finished: &LayoutBox,
        counters: &CounterTracker,
    ) -> Vec<(String, String)> {
        let mut strings: Vec<(String, String)> = Vec::new();
        for (name, items) in &style.string_set {
            let Some(text) = self.content_list_text(finished, items, counters) else {
                continue;
            };
            strings.retain(|(existing, _)| existing != name);
            strings.push((name.clone(), text));
        }
        strings
    }
}

/// `counters()` text: every level rendered, joined by `separator`.
fn render_levels(levels: &[i32], separator: &str, style: &ListStyleType) -> String {
    levels
        .iter()
        .map(|&value| render_value(value, style))
        .collect::<Vec<_>>()
        .join(separator)
}

/// [§ 3.3 Overflow Viewport Propagation](https://www.w3.org/TR/css-overflow-3/#overflow-propagation)
///
/// "UAs must apply the overflow-* values set on the root element to the
/// viewport. However, when the root element is an [HTML] html element
/// (including XML syntax for HTML) whose overflow value is visible (in both
/// axes), and that element has a body element as a child, user agents must
/// instead apply the overflow-* values of the first such child element to
/// the viewport. The element from which the value is propagated must then
/// have a used overflow value of visible."
fn set_viewport_overflow(mut root: BoxRef) -> BoxRef {
    let root_box = Arc::make_mut(&mut root);
    let body = if root_box.element_tag.eq_ignore_ascii_case("html") && root_box.style.overflow == Overflow::Visible {
        root_box
            .children
            .iter()
            .position(|child| child.element_tag.eq_ignore_ascii_case("body"))
    } else {
        None
    };

    match body {
        Some(index) => {
            let body = Arc::make_mut(&mut root_box.children[index]);
            root_box.viewport_overflow = Some(body.style.overflow);
            body.style_mut().overflow = Overflow::Visible;
        }
        None => {
            root_box.viewport_overflow = Some(root_box.style.overflow);
            root_box.style_mut().overflow = Overflow::Visible;
        }
    }
    root
}
