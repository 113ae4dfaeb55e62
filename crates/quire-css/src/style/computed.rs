//! Computed style values consumed by the box tree passes.
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value as
//! defined in the 'Computed Value' line of the property definition table."
//!
//! Style resolution happens outside this crate. A [`ComputedStyle`] is the
//! finished property map for one `(element, pseudo-element)` pair, and its
//! [`Default`] holds the CSS initial values.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::content::{
    ContentItem, ContentValue, CounterIncrement, CounterList, ListStylePosition, ListStyleType,
    Quotes, TextExtractor, default_quotes,
};
use super::display::Display as DisplayValue;
use super::values::{AutoLength, BorderValue, ColorValue, LengthValue};

/// Declares a keyword-only property enum with kebab-case CSS names.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
        #[strum(serialize_all = "kebab-case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

keyword_enum! {
    /// [§ 3 'position'](https://www.w3.org/TR/css-position-3/#position-property)
    Position {
        /// "The box is not a positioned box."
        Static,
        /// Offset relative to its in-flow position.
        Relative,
        /// Taken out of flow, positioned against its containing block.
        Absolute,
        /// Like absolute, against the viewport (the page area).
        Fixed,
    } default Static
}

keyword_enum! {
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    Float {
        /// Not floated.
        None,
        /// Floated to the left.
        Left,
        /// Floated to the right.
        Right,
    } default None
}

keyword_enum! {
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    Clear {
        /// No constraint.
        None,
        /// Below left floats.
        Left,
        /// Below right floats.
        Right,
        /// Below all floats.
        Both,
    } default None
}

keyword_enum! {
    /// [§ 3 'overflow'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
    Overflow {
        /// Content is not clipped.
        Visible,
        /// Content is clipped.
        Hidden,
        /// Clipped, with a scrolling mechanism.
        Scroll,
        /// UA-dependent.
        Auto,
        /// Clipped, without a scroll container.
        Clip,
    } default Visible
}

keyword_enum! {
    /// [§ 3 'white-space'](https://www.w3.org/TR/css-text-3/#white-space-property)
    WhiteSpace {
        /// Collapse spaces and newlines; wrap.
        Normal,
        /// Preserve everything; no wrapping.
        Pre,
        /// Collapse everything; no wrapping.
        Nowrap,
        /// Preserve everything; wrap.
        PreWrap,
        /// Collapse spaces, preserve newlines; wrap.
        PreLine,
        /// Like pre-wrap, preserved spaces take up room.
        BreakSpaces,
    } default Normal
}

impl WhiteSpace {
    /// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
    ///
    /// Whether segment breaks are turned into spaces.
    #[must_use]
    pub const fn collapses_newlines(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap)
    }

    /// Whether sequences of spaces and tabs collapse to one space.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }
}

keyword_enum! {
    /// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
    TextTransform {
        /// No effects.
        None,
        /// First typographic letter unit of each word in titlecase.
        Capitalize,
        /// All characters in uppercase.
        Uppercase,
        /// All characters in lowercase.
        Lowercase,
        /// Characters mapped to their fullwidth form.
        FullWidth,
    } default None
}

keyword_enum! {
    /// [§ 6.1 'hyphens'](https://www.w3.org/TR/css-text-3/#hyphens-property)
    Hyphens {
        /// Words are not hyphenated, even at soft hyphens.
        None,
        /// Words are hyphenated only at soft hyphens.
        Manual,
        /// Automatic hyphenation.
        Auto,
    } default Manual
}

keyword_enum! {
    /// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-3/#direction)
    Direction {
        /// Left-to-right.
        Ltr,
        /// Right-to-left.
        Rtl,
    } default Ltr
}

keyword_enum! {
    /// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders)
    BorderCollapse {
        /// The separated borders model.
        Separate,
        /// The collapsing borders model.
        Collapse,
    } default Separate
}

keyword_enum! {
    /// [§ 17.4.1 'caption-side'](https://www.w3.org/TR/CSS2/tables.html#caption-position)
    CaptionSide {
        /// Caption box above the table box.
        Top,
        /// Caption box below the table box.
        Bottom,
    } default Top
}

keyword_enum! {
    /// [§ 5.3 'box-decoration-break'](https://www.w3.org/TR/css-break-3/#break-decoration)
    BoxDecorationBreak {
        /// Decorations are sliced at breaks.
        Slice,
        /// Each fragment is independently wrapped with the border and padding.
        Clone,
    } default Slice
}

keyword_enum! {
    /// [§ 3.1 'break-before', 'break-after'](https://www.w3.org/TR/css-break-3/#break-between)
    BreakBetween {
        /// Neither force nor forbid a break.
        Auto,
        /// Avoid a break.
        Avoid,
        /// Avoid a page break.
        AvoidPage,
        /// Force a page break.
        Page,
        /// Force one or two page breaks so the next page is a left page.
        Left,
        /// Force one or two page breaks so the next page is a right page.
        Right,
        /// Force breaks so the next page is a recto page.
        Recto,
        /// Force breaks so the next page is a verso page.
        Verso,
        /// Avoid a column break.
        AvoidColumn,
        /// Force a column break.
        Column,
    } default Auto
}

keyword_enum! {
    /// [§ 3.2 'break-inside'](https://www.w3.org/TR/css-break-3/#break-within)
    BreakInside {
        /// Neither force nor forbid a break.
        Auto,
        /// Avoid a break within the box.
        Avoid,
        /// Avoid a page break within the box.
        AvoidPage,
        /// Avoid a column break within the box.
        AvoidColumn,
    } default Auto
}

keyword_enum! {
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    VerticalAlign {
        /// Align baselines.
        Baseline,
        /// Lower to the subscript position.
        Sub,
        /// Raise to the superscript position.
        Super,
        /// Align with the parent's content area top.
        TextTop,
        /// Align with the parent's content area bottom.
        TextBottom,
        /// Align the midpoint with the parent's baseline plus half the x-height.
        Middle,
        /// Align with the line box top.
        Top,
        /// Align with the line box bottom.
        Bottom,
    } default Baseline
}

keyword_enum! {
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    Visibility {
        /// The box is visible.
        Visible,
        /// The box is invisible but still affects layout.
        Hidden,
        /// For table rows and columns, removes the track.
        Collapse,
    } default Visible
}

/// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "For a positioned box, the 'z-index' property specifies:
///
/// 1. The stack level of the box in the current stacking context.
/// 2. Whether the box establishes a stacking context."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ZIndex {
    /// "The stack level of the generated box in the current stacking context
    /// is 0. The box does not establish a new stacking context unless it is
    /// the root element."
    #[default]
    Auto,
    /// "This integer is the stack level of the generated box in the current
    /// stacking context. The box also establishes a new stacking context."
    Integer(i32),
}

impl ZIndex {
    /// The stack level, with `auto` counting as 0.
    #[must_use]
    pub const fn level(self) -> i32 {
        match self {
            Self::Auto => 0,
            Self::Integer(z) => z,
        }
    }
}

/// [§ 7 Transform Functions](https://www.w3.org/TR/css-transforms-1/#transform-functions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TransformFunction {
    /// `translate(tx, ty)`
    Translate(LengthValue, LengthValue),
    /// `scale(sx, sy)`
    Scale(f32, f32),
    /// `rotate(angle)`, in degrees.
    Rotate(f32),
    /// `skew(ax, ay)`, in degrees.
    Skew(f32, f32),
    /// `matrix(a, b, c, d, e, f)`
    Matrix([f32; 6]),
}

/// Four per-side values in top, right, bottom, left order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Side {
    /// Top.
    Top,
    /// Right.
    Right,
    /// Bottom.
    Bottom,
    /// Left.
    Left,
}

impl<T: Copy> Sides<T> {
    /// The same value on all four sides.
    #[must_use]
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl<T> Sides<T> {
    /// The value on `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    /// Mutable access to the value on `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}

/// Computed style for a single element or pseudo-element.
///
/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Only the properties that box generation, normalization and stacking
/// depend on are represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    /// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: DisplayValue,
    /// [§ 3 'position'](https://www.w3.org/TR/css-position-3/#position-property)
    pub position: Position,
    /// [§ 3.1 box insets](https://www.w3.org/TR/css-position-3/#insets)
    pub top: AutoLength,
    /// Right inset.
    pub right: AutoLength,
    /// Bottom inset.
    pub bottom: AutoLength,
    /// Left inset.
    pub left: AutoLength,
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    pub z_index: ZIndex,
    /// [§ 3.2 'opacity'](https://www.w3.org/TR/css-color-4/#transparency)
    pub opacity: f32,
    /// [§ 5 'transform'](https://www.w3.org/TR/css-transforms-1/#transform-property);
    /// empty for `none`.
    pub transform: Vec<TransformFunction>,
    /// [§ 6 'transform-origin'](https://www.w3.org/TR/css-transforms-1/#transform-origin-property)
    pub transform_origin: (LengthValue, LengthValue),
    /// [§ 3 'overflow'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
    pub overflow: Overflow,
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    pub vertical_align: VerticalAlign,

    /// [§ 3.1 'margin'](https://www.w3.org/TR/css-box-3/#margins)
    pub margin: Sides<AutoLength>,
    /// [§ 3.2 'padding'](https://www.w3.org/TR/css-box-3/#paddings)
    pub padding: Sides<LengthValue>,
    /// [§ 3 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
    pub border: Sides<BorderValue>,
    /// [§ 4 'outline'](https://www.w3.org/TR/css-ui-4/#outline-props)
    pub outline: BorderValue,
    /// [§ 5.3 'box-decoration-break'](https://www.w3.org/TR/css-break-3/#break-decoration)
    pub box_decoration_break: BoxDecorationBreak,
    /// [§ 3.1 'break-before'](https://www.w3.org/TR/css-break-3/#break-between)
    pub break_before: BreakBetween,
    /// [§ 3.1 'break-after'](https://www.w3.org/TR/css-break-3/#break-between)
    pub break_after: BreakBetween,
    /// [§ 3.2 'break-inside'](https://www.w3.org/TR/css-break-3/#break-within)
    pub break_inside: BreakInside,

    /// [§ 3 'white-space'](https://www.w3.org/TR/css-text-3/#white-space-property) (inherited)
    pub white_space: WhiteSpace,
    /// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property) (inherited)
    pub text_transform: TextTransform,
    /// [§ 6.1 'hyphens'](https://www.w3.org/TR/css-text-3/#hyphens-property) (inherited)
    pub hyphens: Hyphens,
    /// [§ 2.1 'direction'](https://www.w3.org/TR/css-writing-modes-3/#direction) (inherited)
    pub direction: Direction,
    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property) (inherited)
    pub color: ColorValue,
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility) (inherited)
    pub visibility: Visibility,

    /// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders) (inherited)
    pub border_collapse: BorderCollapse,
    /// [§ 17.4.1 'caption-side'](https://www.w3.org/TR/CSS2/tables.html#caption-position) (inherited)
    pub caption_side: CaptionSide,

    /// [§ 3.1 'list-style-type'](https://www.w3.org/TR/css-lists-3/#text-markers) (inherited)
    pub list_style_type: ListStyleType,
    /// [§ 3.2 'list-style-image'](https://www.w3.org/TR/css-lists-3/#image-markers) (inherited);
    /// an unresolved URL, `None` for `none`.
    pub list_style_image: Option<String>,
    /// [§ 2.2 'list-style-position'](https://www.w3.org/TR/css-lists-3/#list-style-position-property) (inherited)
    pub list_style_position: ListStylePosition,
    /// [§ 4.2 'counter-reset'](https://www.w3.org/TR/css-lists-3/#counter-reset)
    pub counter_reset: CounterList,
    /// [§ 4.3 'counter-set'](https://www.w3.org/TR/css-lists-3/#increment-set)
    pub counter_set: CounterList,
    /// [§ 4.3 'counter-increment'](https://www.w3.org/TR/css-lists-3/#increment-set)
    pub counter_increment: CounterIncrement,
    /// [§ 1.1 'content'](https://www.w3.org/TR/css-content-3/#content-property)
    pub content: ContentValue,
    /// [§ 3.3 'quotes'](https://www.w3.org/TR/css-content-3/#quotes) (inherited)
    pub quotes: Quotes,

    /// Name under which `target-*()` functions find the element; the user
    /// agent takes it from the `id` attribute.
    pub anchor: Option<String>,
    /// [§ 1.1 'string-set'](https://www.w3.org/TR/css-gcpm-3/#setting-named-strings-the-string-set-pro)
    ///
    /// `(name, content list)` pairs; empty for `none`.
    pub string_set: Vec<(String, Vec<ContentItem>)>,
    /// [§ 5.1 'bookmark-level'](https://www.w3.org/TR/css-gcpm-3/#bookmark-level)
    /// `None` for `none`: the element makes no bookmark.
    pub bookmark_level: Option<u32>,
    /// [§ 5.2 'bookmark-label'](https://www.w3.org/TR/css-gcpm-3/#bookmark-label)
    pub bookmark_label: Vec<ContentItem>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: DisplayValue::default(),
            position: Position::default(),
            top: AutoLength::Auto,
            right: AutoLength::Auto,
            bottom: AutoLength::Auto,
            left: AutoLength::Auto,
            float: Float::default(),
            clear: Clear::default(),
            z_index: ZIndex::default(),
            opacity: 1.0,
            transform: Vec::new(),
            transform_origin: (LengthValue::Percent(50.0), LengthValue::Percent(50.0)),
            overflow: Overflow::default(),
            vertical_align: VerticalAlign::default(),
            margin: Sides::all(AutoLength::ZERO),
            padding: Sides::all(LengthValue::ZERO),
            // "Initial: medium", with `border-style: none` the used width is 0.
            border: Sides::all(BorderValue::new(3.0, Default::default(), ColorValue::BLACK)),
            outline: BorderValue::new(3.0, Default::default(), ColorValue::BLACK),
            box_decoration_break: BoxDecorationBreak::default(),
            break_before: BreakBetween::default(),
            break_after: BreakBetween::default(),
            break_inside: BreakInside::default(),
            white_space: WhiteSpace::default(),
            text_transform: TextTransform::default(),
            hyphens: Hyphens::default(),
            direction: Direction::default(),
            color: ColorValue::BLACK,
            visibility: Visibility::default(),
            border_collapse: BorderCollapse::default(),
            caption_side: CaptionSide::default(),
            list_style_type: ListStyleType::default(),
            list_style_image: None,
            list_style_position: ListStylePosition::default(),
            counter_reset: Vec::new(),
            counter_set: Vec::new(),
            counter_increment: CounterIncrement::default(),
            content: ContentValue::default(),
            quotes: default_quotes(),
            anchor: None,
            string_set: Vec::new(),
            bookmark_level: None,
            // "Initial: content(text)"
            bookmark_label: vec![ContentItem::Content(TextExtractor::Text)],
        }
    }
}

impl ComputedStyle {
    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// A style whose inherited properties come from `parent` and whose other
    /// properties have their initial value. This is the style of anonymous
    /// boxes: "the non-inherited properties have their initial value".
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            white_space: parent.white_space,
            text_transform: parent.text_transform,
            hyphens: parent.hyphens,
            direction: parent.direction,
            color: parent.color,
            visibility: parent.visibility,
            border_collapse: parent.border_collapse,
            caption_side: parent.caption_side,
            list_style_type: parent.list_style_type.clone(),
            list_style_image: parent.list_style_image.clone(),
            list_style_position: parent.list_style_position,
            quotes: parent.quotes.clone(),
            ..Self::default()
        }
    }

    /// [§ 3 'position'](https://www.w3.org/TR/css-position-3/#position-property)
    /// "A positioned box is a box whose computed position value is anything
    /// other than static."
    #[must_use]
    pub fn is_positioned(&self) -> bool {
        self.position != Position::Static
    }

    /// Absolutely positioned: `absolute` or `fixed`.
    #[must_use]
    pub const fn is_absolutely_positioned(&self) -> bool {
        matches!(self.position, Position::Absolute | Position::Fixed)
    }

    /// Whether `float` is not `none`.
    #[must_use]
    pub fn is_floated(&self) -> bool {
        self.float != Float::None
    }
}
