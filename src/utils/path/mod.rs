//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `expand_path`)
//! - [`web`]: Forward-slash hrefs for HTML (`relative_href`, `resolve_href`)

pub mod fs;
pub mod web;

pub use fs::{expand_path, normalize_path};
pub use web::{relative_href, resolve_href};
