//! Query parsing and ranked search over note summaries.

pub mod matcher;
pub mod parser;
pub mod types;

pub use matcher::{build_snippet, run_search, run_search_at};
pub use parser::parse_query;
pub use types::*;
