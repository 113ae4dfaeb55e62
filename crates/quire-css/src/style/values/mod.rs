//! Computed value types shared by style properties.

mod border;
mod color;
mod length;

pub use border::{BorderStyle, BorderValue};
pub use color::ColorValue;
pub use length::{AutoLength, LengthValue};
