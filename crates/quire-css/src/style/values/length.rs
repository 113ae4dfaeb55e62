//! CSS Length values
//!
//! [§ 6 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! Lengths reach the box tree already computed: relative units other than
//! percentages have been resolved to pixels by the style resolver.

use serde::Serialize;

/// A computed `<length-percentage>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthValue {
    /// Absolute length in CSS pixels.
    Px(f32),
    /// [§ 5.5 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    /// Resolved against a reference length during layout.
    Percent(f32),
}

impl LengthValue {
    /// The zero length.
    pub const ZERO: Self = Self::Px(0.0);
}

impl Default for LengthValue {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A length that may also be `auto` (margins and box offsets).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum AutoLength {
    /// The `auto` keyword.
    #[default]
    Auto,
    /// A definite length or percentage.
    Length(LengthValue),
}

impl AutoLength {
    /// A zero length (the initial value of `margin-*`).
    pub const ZERO: Self = Self::Length(LengthValue::ZERO);
}
