//! Tags command implementation.

use crate::cli::args::TagsArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::Result;
use crate::graph::TagStat;
use crate::repository::Repository;
use crate::types::NoteSummary;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<TagStat>,
}

#[derive(Debug, Serialize)]
pub struct TaggedNotesResponse {
    pub tag: String,
    pub notes: Vec<NoteSummary>,
}

pub fn run(config: &Config, args: &TagsArgs, output: &Output) -> Result<()> {
    let mut config = config.clone();
    args.out.apply(&mut config);

    let repo = Repository::open(&config.paths.data_dir, &config.paths.generated_dir)?;

    match &args.tag {
        Some(tag) => {
            let mut notes: Vec<NoteSummary> = repo.notes_by_tag(tag).into_iter().cloned().collect();
            if let Some(limit) = args.limit {
                notes.truncate(limit);
            }
            output.print(&TaggedNotesResponse {
                tag: tag.trim_start_matches('#').to_string(),
                notes,
            })
        }
        None => output.print(&TagsResponse {
            tags: repo.tag_stats(args.limit),
        }),
    }
}
