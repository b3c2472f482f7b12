//! Search command implementation.

use crate::cli::args::SearchArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::Result;
use crate::export::{NOTES_INDEX_FILE, NotesIndex, read_json};
use crate::search::{SearchQuery, SearchResult, parse_query, run_search};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: SearchQuery,
    /// Matches before `--limit` is applied.
    pub total: usize,
    pub results: Vec<SearchResult>,
}

pub fn run(config: &Config, args: &SearchArgs, output: &Output) -> Result<()> {
    let mut config = config.clone();
    args.out.apply(&mut config);

    let index: NotesIndex = read_json(&config.paths.data_dir.join(NOTES_INDEX_FILE))?;
    let query = parse_query(&args.query);

    let mut results = run_search(&index.items, &query);
    let total = results.len();
    results.truncate(args.limit);

    output.print(&SearchResponse {
        query,
        total,
        results,
    })
}
