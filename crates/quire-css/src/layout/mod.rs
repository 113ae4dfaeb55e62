//! Box tree construction and normalization.
//!
//! This module turns a styled element tree into the formatting structure
//! consumed by flow layout, and splits laid out trees into stacking
//! contexts for painting.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Tables](https://www.w3.org/TR/CSS2/tables.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//! - [CSS Lists and Counters Module Level 3](https://www.w3.org/TR/css-lists-3/)
//! - [CSS 2.1 Appendix E: Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//! - [CSS Generated Content for Paged Media](https://www.w3.org/TR/css-gcpm-3/)
//!
//! # Module Structure
//!
//! - [`boxes`] - Box kinds, flags and capability queries
//! - [`box_model`] - Used geometry and rounded rectangles
//! - [`builder`] - Element tree to box tree, generated content, markers
//! - [`html`] - HTML element handlers and replaced content
//! - [`whitespace`] - White space collapsing and text transformation
//! - [`table`] - Anonymous table objects and the table grid
//! - [`collapse`] - Collapsed table borders
//! - [`flex`] - Flex item fixup
//! - [`inline`] - Line boxes and block-in-inline splitting
//! - [`stacking`] - Stacking contexts and painting order
//! - [`target`] - Anchors for `target-counter()` and `target-text()`

pub mod box_model;
pub mod boxes;
pub mod builder;
pub mod collapse;
pub mod flex;
pub mod html;
pub mod inline;
pub mod stacking;
pub mod table;
pub mod target;
pub mod whitespace;

pub use box_model::{BoxGeometry, CornerRadii, EdgeSizes, Rect, RoundedRect};
pub use boxes::{BoxFlags, BoxKind, BoxRef, LayoutBox, ReplacedContent, TableData};
pub use builder::{BuildError, BuildOptions, build_formatting_structure};
pub use collapse::{CollapsedBorder, CollapsedBorders, collapse_table_borders};
pub use flex::flex_boxes;
pub use html::{ReplacedContentResolver, find_base_url};
pub use inline::{block_in_inline, inline_in_block};
pub use stacking::{PaintStep, StackingContext};
pub use table::anonymous_table_boxes;
pub use target::{Target, TargetCollector, anchor_name, box_text};
pub use whitespace::{process_text_transform, process_whitespace};
