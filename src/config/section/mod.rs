//! Configuration section definitions.
//!
//! Each module corresponds to a section in `stylebake.toml`:
//!
//! | Module       | TOML Section                            | Purpose                          |
//! |--------------|-----------------------------------------|----------------------------------|
//! | `corpus`     | `[corpus]`                              | Which documents to rewrite       |
//! | `stylesheet` | `[stylesheet]`, `[stylesheet.compiler]` | Artifact delivery and compiling  |
//! | `rewrite`    | `[rewrite]`                             | Optional rewrite steps           |
//! | `patterns`   | `[patterns]`                            | Hosts and names to match         |
//! | `preconnect` | `[preconnect]`                          | Resource hint scanning           |

mod corpus;
mod patterns;
mod preconnect;
mod rewrite;
mod stylesheet;

pub use corpus::CorpusConfig;
pub use patterns::PatternsConfig;
pub use preconnect::PreconnectConfig;
pub use rewrite::RewriteConfig;
pub use stylesheet::{CompilerConfig, Delivery, StylesheetConfig};
