//! Resolve command implementation.

use crate::cli::args::ResolveArgs;
use crate::cli::output::Output;
use crate::compiler::{CompileOptions, prepare};
use crate::config::Config;
use crate::error::{NotegraphError, Result};
use crate::parser::lookup_key;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    /// Normalized lookup key.
    pub key: String,
    pub id: String,
    pub slug: String,
    pub title: String,
    /// Every key that resolves to this note.
    pub keys: Vec<String>,
}

pub fn run(config: &Config, args: &ResolveArgs, output: &Output) -> Result<()> {
    let mut config = config.clone();
    args.content.apply(&mut config);

    let prepared = prepare(&CompileOptions::from(&config))?;
    let record = prepared
        .index
        .resolve(&args.name)
        .ok_or_else(|| NotegraphError::NoteNotFound(args.name.clone()))?;

    let response = ResolveResponse {
        query: args.name.clone(),
        key: lookup_key(&args.name),
        id: record.id.clone(),
        slug: record.slug.clone(),
        title: record.title.clone(),
        keys: prepared
            .index
            .keys_for(&record.id)
            .into_iter()
            .map(String::from)
            .collect(),
    };
    output.print(&response)
}
