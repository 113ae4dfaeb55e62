//! Common utilities for the Quire box tree engine.
//!
//! This crate provides shared infrastructure used by the DOM and CSS crates:
//! - **Warning System** - deduplicated `tracing` warnings for unsupported input
//! - **URL Resolution** - resolving attribute URLs against a document base URL

pub mod url;
pub mod warning;
