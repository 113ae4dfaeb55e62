//! CSS Border values
//!
//! [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::color::ColorValue;

/// [§ 3.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum BorderStyle {
    /// "No border. Color and width are ignored."
    #[default]
    None,
    /// "Same as none, but has different behavior in the border conflict
    /// resolution rules for border-collapsed tables."
    Hidden,
    /// "A series of round dots."
    Dotted,
    /// "A series of square-ended dashes."
    Dashed,
    /// "A single line segment."
    Solid,
    /// "Two parallel solid lines with some space between them."
    Double,
    /// "Looks as if it were carved in the canvas."
    Groove,
    /// "Looks as if it were coming out of the canvas."
    Ridge,
    /// "Looks as if the content on the inside of the border is sunken."
    Inset,
    /// "Looks as if the content on the inside of the border is coming out."
    Outset,
}

/// [§ 3 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
///
/// Border value representing width, style, and color of one side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderValue {
    /// [§ 3.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub width: f32,
    /// [§ 3.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    pub style: BorderStyle,
    /// [§ 3.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    /// Used value; `currentcolor` is resolved by the style resolver.
    pub color: ColorValue,
}

impl BorderValue {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(width: f32, style: BorderStyle, color: ColorValue) -> Self {
        Self { width, style, color }
    }

    /// [§ 3.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    ///
    /// Computed value: "absolute length, snapped as a border width; zero if
    /// the border style is none or hidden".
    #[must_use]
    pub fn used_width(&self) -> f32 {
        match self.style {
            BorderStyle::None | BorderStyle::Hidden => 0.0,
            _ => self.width,
        }
    }
}
