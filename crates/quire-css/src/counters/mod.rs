//! Counters, quotes and counter styles.
//!
//! [CSS Lists and Counters Level 3](https://www.w3.org/TR/css-lists-3/)

pub mod counter_style;
pub mod tracker;

pub use counter_style::{PredefinedStyle, render_marker, render_value};
pub use tracker::{CounterScope, CounterTracker, CounterValues, LIST_ITEM};
