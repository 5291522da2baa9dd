//! Utility modules shared across the rewrite pipeline.
//!
//! - [`html`]: attribute escaping and raw-text element classification
//! - [`path`]: path normalization and href computation
//! - [`plural`]: count formatting for log output

pub mod html;
pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
