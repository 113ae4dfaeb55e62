//! Computed style representation.
//!
//! [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/)

pub mod computed;
pub mod content;
pub mod display;
pub mod resolver;
pub mod values;

pub use computed::{
    BorderCollapse, BoxDecorationBreak, BreakBetween, BreakInside, CaptionSide, Clear,
    ComputedStyle, Direction, Float, Hyphens, Overflow, Position, Side, Sides, TextTransform,
    TransformFunction, VerticalAlign, Visibility, WhiteSpace, ZIndex,
};
pub use content::{
    ContentItem, ContentValue, CounterIncrement, CounterList, ListStylePosition, ListStyleType,
    Quotes, SymbolsType, TextExtractor, default_quotes,
};
pub use display::{Display, InnerDisplayType, InternalDisplayType, OuterDisplayType};
pub use resolver::{PseudoElement, StyleMap, StyleResolver, apply_user_agent_defaults, default_display_for_element};
pub use values::{AutoLength, BorderStyle, BorderValue, ColorValue, LengthValue};
