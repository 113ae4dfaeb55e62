//! Box tree construction for the Quire paged-media engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Computed styles** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - The property values box generation reads, with CSS initial values
//!   - The `StyleResolver` input contract and a map-backed implementation
//!
//! - **Counters** ([CSS Lists Level 3](https://www.w3.org/TR/css-lists-3/))
//!   - Scoped counter stacks, `counter-reset` / `set` / `increment`
//!   - Predefined counter styles and `symbols()`
//!
//! - **Box tree** ([CSS 2.1 § 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - Principal boxes, `::marker`, `::before`, `::after`
//!   - Named strings, bookmark labels and `target-*()` cross-references
//!   - HTML element handlers (images, objects, table spans)
//!   - White space processing and text transformation
//!   - Anonymous table objects, table grid and collapsed borders
//!   - Flex items, line boxes, block-in-inline splitting
//!
//! - **Stacking contexts** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Context partitioning and painting order
//!
//! # Not Yet Implemented
//!
//! - Flow layout itself (geometry is filled in by a separate layout stage)
//! - `::first-line` and `::first-letter` boxes (their styles are kept on
//!   the element's box for line layout)
//! - Page margin boxes: `string()` and running elements produce nothing

pub mod counters;
pub mod layout;
pub mod style;
