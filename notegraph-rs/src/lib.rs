//! Notegraph - compiles a folder of markdown notes into a resolved content graph.
//!
//! # Overview
//!
//! A build reads every note under a content folder and produces:
//! - Canonical note records with stable ids (`n_01`, `n_02`, ... in slug order)
//! - Resolved wikilinks (`[[note]]`, `[[note#Heading]]`, `[[note^block]]`,
//!   `![[embed]]`), with unresolved ones kept and flagged as broken
//! - Backlinks, a weighted note graph and a tag index
//! - Rendered HTML with stable heading and block anchors
//! - JSON artifacts for a rendering layer, and a search engine over them
//!
//! # Example
//!
//! ```no_run
//! use notegraph::compiler::{compile, CompileOptions};
//! use notegraph::search::{parse_query, run_search};
//!
//! let options = CompileOptions {
//!     content_dir: "content/demo".into(),
//!     asset_url_prefix: "/vault".to_string(),
//! };
//! let compilation = compile(&options).unwrap();
//!
//! for warning in &compilation.warnings {
//!     println!("{}", warning);
//! }
//!
//! let results = run_search(&compilation.summaries(), &parse_query("tag:#meta \"grafo\""));
//! for result in results {
//!     println!("{} ({}): {}", result.note.title, result.score, result.snippet);
//! }
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod note;
pub mod parser;
pub mod render;
pub mod repository;
pub mod search;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use compiler::{Compilation, CompileOptions, compile};
pub use config::Config;
pub use error::{NotegraphError, Result};
pub use note::NoteDraft;
pub use repository::Repository;
pub use types::*;
pub use vault::Vault;
