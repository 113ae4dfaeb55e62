//! The box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Every box is one [`LayoutBox`] of shared fields plus a [`BoxKind`]
//! payload. Boxes are reference counted and never mutated once shared: a
//! pass that changes a box's children builds a new box with
//! [`LayoutBox::with_children`] and reuses every unchanged subtree.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use strum_macros::AsRefStr;

use quire_common::url::Url;
use quire_dom::NodeId;

use crate::style::{
    AutoLength, BoxDecorationBreak, ComputedStyle, Direction, Display, InternalDisplayType,
    LengthValue, Overflow, Side, Sides,
};

use super::box_model::BoxGeometry;
use super::collapse::CollapsedBorders;

/// A shared, immutable box.
pub type BoxRef = Arc<LayoutBox>;

/// [§ 3 Replaced elements](https://www.w3.org/TR/css-display-3/#replaced-element)
///
/// "An element whose content is outside the scope of the CSS formatting
/// model, such as an image or embedded document." The builder only keeps a
/// handle; decoding is the renderer's business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacedContent {
    /// Resolved URL of the resource.
    pub uri: Url,
    /// MIME type, when known.
    pub mime_type: Option<String>,
    /// Natural width in CSS pixels, when known.
    pub intrinsic_width: Option<f32>,
    /// Natural height in CSS pixels, when known.
    pub intrinsic_height: Option<f32>,
}

impl ReplacedContent {
    /// Content with no known type or natural size.
    #[must_use]
    pub const fn new(uri: Url) -> Self {
        Self {
            uri,
            mime_type: None,
            intrinsic_width: None,
            intrinsic_height: None,
        }
    }
}

/// Table-only state carried by `Table` and `InlineTable` boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    /// [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
    ///
    /// Column groups live beside the row groups, not among the children.
    pub column_groups: Vec<BoxRef>,
    /// Resolved border grids when `border-collapse: collapse`.
    pub collapsed_borders: Option<CollapsedBorders>,
}

/// The closed set of box kinds.
#[derive(Debug, Clone, PartialEq, Serialize, AsRefStr)]
pub enum BoxKind {
    /// Block-level block container.
    Block,
    /// A line of inline-level content, inside a block container.
    Line,
    /// Inline box whose content joins the surrounding inline formatting context.
    Inline,
    /// A run of text. Never has children.
    Text(String),
    /// Inline-level block container.
    InlineBlock,
    /// Block-level replaced element.
    BlockReplaced(ReplacedContent),
    /// Inline-level replaced element.
    InlineReplaced(ReplacedContent),
    /// Block-level table.
    Table(TableData),
    /// Inline-level table (block-level once inside its wrapper).
    InlineTable(TableData),
    /// `table-row-group`, `table-header-group` or `table-footer-group`.
    TableRowGroup {
        /// Repeated at the top of each page fragment.
        is_header: bool,
        /// Repeated at the bottom of each page fragment.
        is_footer: bool,
    },
    /// `table-row`
    TableRow,
    /// `table-column-group`
    TableColumnGroup {
        /// Number of columns spanned.
        span: usize,
        /// First grid column.
        grid_x: usize,
    },
    /// `table-column`
    TableColumn {
        /// Number of columns spanned.
        span: usize,
        /// Grid column.
        grid_x: usize,
    },
    /// `table-cell`
    TableCell {
        /// Number of columns spanned, at least 1.
        colspan: usize,
        /// Number of rows spanned; 0 spans to the end of the row group.
        rowspan: usize,
        /// Grid column of the cell's first slot.
        grid_x: usize,
    },
    /// `table-caption`
    TableCaption,
    /// A page of paged media.
    Page,
    /// [§ 5.3 Page-margin boxes](https://www.w3.org/TR/css-page-3/#margin-boxes)
    MarginBox {
        /// The margin rule, e.g. `@top-center`.
        at_keyword: String,
    },
    /// Block-level flex container.
    Flex,
    /// Inline-level flex container.
    InlineFlex,
}

impl BoxKind {
    /// A table cell spanning one slot.
    #[must_use]
    pub const fn cell() -> Self {
        Self::TableCell {
            colspan: 1,
            rowspan: 1,
            grid_x: 0,
        }
    }

    /// A plain body row group.
    #[must_use]
    pub const fn row_group() -> Self {
        Self::TableRowGroup {
            is_header: false,
            is_footer: false,
        }
    }

    /// A column group spanning one column.
    #[must_use]
    pub const fn column_group() -> Self {
        Self::TableColumnGroup { span: 1, grid_x: 0 }
    }

    /// A column spanning one column.
    #[must_use]
    pub const fn column() -> Self {
        Self::TableColumn { span: 1, grid_x: 0 }
    }

    /// The `display` value an anonymous box of this kind computes to.
    #[must_use]
    pub const fn anonymous_display(&self) -> Display {
        match self {
            Self::Block | Self::BlockReplaced(_) | Self::Page | Self::MarginBox { .. } => {
                Display::block()
            }
            Self::Line | Self::Inline | Self::Text(_) | Self::InlineReplaced(_) => Display::inline(),
            Self::InlineBlock => Display::inline_block(),
            Self::Table(_) => Display::table(),
            Self::InlineTable(_) => Display::inline_table(),
            Self::TableRowGroup { .. } => Display::Internal(InternalDisplayType::TableRowGroup),
            Self::TableRow => Display::Internal(InternalDisplayType::TableRow),
            Self::TableColumnGroup { .. } => Display::Internal(InternalDisplayType::TableColumnGroup),
            Self::TableColumn { .. } => Display::Internal(InternalDisplayType::TableColumn),
            Self::TableCell { .. } => Display::Internal(InternalDisplayType::TableCell),
            Self::TableCaption => Display::Internal(InternalDisplayType::TableCaption),
            Self::Flex => Display::flex(),
            Self::InlineFlex => Display::inline_flex(),
        }
    }
}

/// Per-box boolean state.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoxFlags {
    /// Generated by a normalization pass, not by an element.
    pub is_anonymous: bool,
    /// The principal box of the root element.
    pub is_for_root_element: bool,
    /// The anonymous block wrapping a table and its captions.
    pub is_table_wrapper: bool,
    /// An `<a rel="attachment">` link.
    pub is_attachment: bool,
    /// A `::marker` box.
    pub is_list_marker: bool,
    /// A child of a flex container.
    pub is_flex_item: bool,
    /// A collapsible space was removed from the start of this text.
    pub leading_collapsible_space: bool,
    /// This text ends with a collapsible space.
    pub trailing_collapsible_space: bool,
}

/// One box of the formatting structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// The box kind and its kind-specific fields.
    pub kind: BoxKind,
    /// Tag of the generating element (`"p"`, `"li::marker"`); anonymous
    /// boxes copy their parent's.
    pub element_tag: String,
    /// The generating element.
    #[serde(skip)]
    pub element: Option<NodeId>,
    /// The resolved style.
    pub style: Arc<ComputedStyle>,
    /// Owned children, in order.
    pub children: Vec<BoxRef>,
    /// Used geometry, zero until flow layout.
    pub geometry: BoxGeometry,
    /// Boolean state.
    pub flags: BoxFlags,
    /// [§ 3.3 Overflow Viewport Propagation](https://www.w3.org/TR/css-overflow-3/#overflow-propagation)
    ///
    /// Set on the root box only: the overflow that applies to the viewport.
    pub viewport_overflow: Option<Overflow>,
    /// Sides whose spacing was removed by [`LayoutBox::remove_decoration`].
    pub removed_decoration: Sides<bool>,
    /// [§ 1.1 'string-set'](https://www.w3.org/TR/css-gcpm-3/#setting-named-strings-the-string-set-pro)
    ///
    /// Named strings set by this element, in declaration order, one per name.
    pub string_set: Vec<(String, String)>,
    /// Resolved `bookmark-label`, for elements with a `bookmark-level`.
    pub bookmark_label: Option<String>,
    /// Style of the element's `::first-letter`, if it has one.
    #[serde(skip)]
    pub first_letter_style: Option<Arc<ComputedStyle>>,
    /// Style of the element's `::first-line`, if it has one.
    #[serde(skip)]
    pub first_line_style: Option<Arc<ComputedStyle>>,
}

impl LayoutBox {
    /// A new non-anonymous box.
    #[must_use]
    pub fn new(
        kind: BoxKind,
        element_tag: impl Into<String>,
        element: Option<NodeId>,
        style: Arc<ComputedStyle>,
        children: Vec<BoxRef>,
    ) -> Self {
        Self {
            kind,
            element_tag: element_tag.into(),
            element,
            style,
            children,
            geometry: BoxGeometry::default(),
            flags: BoxFlags::default(),
            viewport_overflow: None,
            removed_decoration: Sides::default(),
            string_set: Vec::new(),
            bookmark_label: None,
            first_letter_style: None,
            first_line_style: None,
        }
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box. Non-inherited properties have their initial
    /// value."
    #[must_use]
    pub fn anonymous_from(parent: &Self, kind: BoxKind, children: Vec<BoxRef>) -> Self {
        let mut style = ComputedStyle::inherit_from(&parent.style);
        style.display = kind.anonymous_display();
        let mut anonymous = Self::new(
            kind,
            parent.element_tag.clone(),
            parent.element,
            Arc::new(style),
            children,
        );
        anonymous.flags.is_anonymous = true;
        anonymous
    }

    /// A text box with `parent`'s inherited style.
    #[must_use]
    pub fn anonymous_text(parent: &Self, text: impl Into<String>) -> Self {
        Self::anonymous_from(parent, BoxKind::Text(text.into()), Vec::new())
    }

    /// A copy of this box with other children.
    ///
    /// Removed decorations are not carried over.
    #[must_use]
    pub fn with_children(&self, children: Vec<BoxRef>) -> Self {
        Self {
            kind: self.kind.clone(),
            element_tag: self.element_tag.clone(),
            element: self.element,
            style: Arc::clone(&self.style),
            children,
            geometry: self.geometry,
            flags: self.flags,
            viewport_overflow: self.viewport_overflow,
            removed_decoration: Sides::default(),
            string_set: self.string_set.clone(),
            bookmark_label: self.bookmark_label.clone(),
            first_letter_style: self.first_letter_style.clone(),
            first_line_style: self.first_line_style.clone(),
        }
    }

    /// A copy of this box without children.
    #[must_use]
    pub fn shallow_copy(&self) -> Self {
        self.with_children(Vec::new())
    }

    /// Kind name, for logs and serialized trees.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.kind.as_ref()
    }

    /// The text of a Text box.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Table state of a Table or `InlineTable` box.
    #[must_use]
    pub const fn table_data(&self) -> Option<&TableData> {
        match &self.kind {
            BoxKind::Table(data) | BoxKind::InlineTable(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable table state of a Table or `InlineTable` box.
    pub const fn table_data_mut(&mut self) -> Option<&mut TableData> {
        match &mut self.kind {
            BoxKind::Table(data) | BoxKind::InlineTable(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable access to the style, cloning it if shared.
    pub fn style_mut(&mut self) -> &mut ComputedStyle {
        Arc::make_mut(&mut self.style)
    }

    // Capability queries.

    /// Whether the box can have children (everything but text and replaced).
    #[must_use]
    pub const fn is_parent(&self) -> bool {
        !matches!(
            self.kind,
            BoxKind::Text(_) | BoxKind::BlockReplaced(_) | BoxKind::InlineReplaced(_)
        )
    }

    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// Tables count as block-level whether inline or not: an inline table
    /// sits inside an inline-level wrapper.
    #[must_use]
    pub const fn is_block_level(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::Block
                | BoxKind::BlockReplaced(_)
                | BoxKind::Table(_)
                | BoxKind::InlineTable(_)
                | BoxKind::TableCaption
                | BoxKind::Flex
        )
    }

    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    #[must_use]
    pub const fn is_inline_level(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::Inline
                | BoxKind::Text(_)
                | BoxKind::InlineBlock
                | BoxKind::InlineReplaced(_)
                | BoxKind::InlineFlex
        )
    }

    /// A box that contains only block-level boxes or establishes an inline
    /// formatting context.
    #[must_use]
    pub const fn is_block_container(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::Block
                | BoxKind::InlineBlock
                | BoxKind::TableCell { .. }
                | BoxKind::TableCaption
                | BoxKind::MarginBox { .. }
        )
    }

    /// Whether the box is a replaced element.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::BlockReplaced(_) | BoxKind::InlineReplaced(_)
        )
    }

    /// Table or inline table.
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self.kind, BoxKind::Table(_) | BoxKind::InlineTable(_))
    }

    /// Flex or inline flex container.
    #[must_use]
    pub const fn is_flex_container(&self) -> bool {
        matches!(self.kind, BoxKind::Flex | BoxKind::InlineFlex)
    }

    /// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
    ///
    /// "A 'proper table child' is a 'table-row-group', 'table-header-group',
    /// 'table-footer-group', 'table-row', 'table-caption',
    /// 'table-column-group' or 'table-column' box."
    #[must_use]
    pub const fn is_proper_table_child(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::TableRowGroup { .. }
                | BoxKind::TableRow
                | BoxKind::TableColumnGroup { .. }
                | BoxKind::TableColumn { .. }
                | BoxKind::TableCaption
        )
    }

    /// "An 'internal table box' is a 'table-row-group', 'table-header-group',
    /// 'table-footer-group', 'table-row', 'table-column-group',
    /// 'table-column', or 'table-cell'", here plus 'table-caption'.
    #[must_use]
    pub const fn is_internal_table_or_caption(&self) -> bool {
        self.is_proper_table_child() || matches!(self.kind, BoxKind::TableCell { .. })
    }

    /// "A 'tabular container' is a 'table-row' or a 'proper table parent'."
    #[must_use]
    pub const fn is_tabular_container(&self) -> bool {
        matches!(
            self.kind,
            BoxKind::Table(_) | BoxKind::InlineTable(_) | BoxKind::TableRowGroup { .. } | BoxKind::TableRow
        )
    }

    /// Whether `parent` is a proper parent of this box.
    ///
    /// "A 'proper table row parent' is a 'table' or 'inline-table' box or a
    /// 'table-row-group', 'table-header-group', or 'table-footer-group'."
    #[must_use]
    pub const fn is_proper_parent(&self, parent: &Self) -> bool {
        match self.kind {
            BoxKind::TableRowGroup { .. } | BoxKind::TableColumnGroup { .. } | BoxKind::TableCaption => {
                parent.is_table()
            }
            BoxKind::TableRow => {
                parent.is_table() || matches!(parent.kind, BoxKind::TableRowGroup { .. })
            }
            BoxKind::TableColumn { .. } => {
                parent.is_table() || matches!(parent.kind, BoxKind::TableColumnGroup { .. })
            }
            _ => false,
        }
    }

    /// Whether the box is floated.
    #[must_use]
    pub fn is_floated(&self) -> bool {
        self.style.is_floated()
    }

    /// Whether the box is absolutely positioned.
    #[must_use]
    pub fn is_absolutely_positioned(&self) -> bool {
        self.style.is_absolutely_positioned()
    }

    /// [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
    ///
    /// Neither floated nor absolutely positioned.
    #[must_use]
    pub fn is_in_normal_flow(&self) -> bool {
        !self.is_floated() && !self.is_absolutely_positioned()
    }

    /// Whether the box is a Text box with no characters.
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        self.text().is_some_and(str::is_empty)
    }

    /// This box and all of its descendants, in tree order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// [§ 5.3 Fragmented Box Decorations](https://www.w3.org/TR/css-break-3/#break-decoration)
    ///
    /// Zero the margin, padding and border width of `side` and record it.
    pub fn reset_spacing(&mut self, side: Side) {
        *self.removed_decoration.get_mut(side) = true;

        let style = self.style_mut();
        *style.margin.get_mut(side) = AutoLength::ZERO;
        *style.padding.get_mut(side) = LengthValue::ZERO;
        style.border.get_mut(side).width = 0.0;

        *self.geometry.margin.side_mut(side) = 0.0;
        *self.geometry.padding.side_mut(side) = 0.0;
        *self.geometry.border.side_mut(side) = 0.0;
    }

    /// [§ 5.3 'box-decoration-break'](https://www.w3.org/TR/css-break-3/#break-decoration)
    ///
    /// "slice: The effect is as though the element were rendered with no
    /// breaks present, and then sliced by the breaks afterward." Remove the
    /// spacing on the start and/or end edge of a fragment: top and bottom
    /// for block boxes, the inline start and end for inline boxes.
    pub fn remove_decoration(&mut self, start: bool, end: bool) {
        if self.style.box_decoration_break == BoxDecorationBreak::Clone {
            return;
        }
        let (start_side, end_side) = if matches!(self.kind, BoxKind::Inline | BoxKind::Text(_)) {
            match self.style.direction {
                Direction::Ltr => (Side::Left, Side::Right),
                Direction::Rtl => (Side::Right, Side::Left),
            }
        } else {
            (Side::Top, Side::Bottom)
        };
        if start {
            self.reset_spacing(start_side);
        }
        if end {
            self.reset_spacing(end_side);
        }
    }

    /// An indented, one-line-per-box rendering of the subtree.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{:indent$}{} <{}>", "", self.kind_name(), self.element_tag, indent = depth * 2);
        if let Some(text) = self.text() {
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        if let Some(table) = self.table_data() {
            for group in &table.column_groups {
                group.dump_into(out, depth + 1);
            }
        }
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}
