//! Build command implementation.

use crate::cli::args::BuildArgs;
use crate::cli::output::Output;
use crate::compiler::{CompileOptions, compile};
use crate::config::Config;
use crate::error::Result;
use crate::export::{publish_assets, write_artifacts};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    pub notes: usize,
    pub link_edges: usize,
    pub graph_edges: usize,
    pub assets: usize,
    pub elapsed_ms: u64,
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn run(config: &Config, args: &BuildArgs, output: &Output) -> Result<()> {
    let mut config = config.clone();
    args.content.apply(&mut config);
    args.out.apply(&mut config);

    let compilation = compile(&CompileOptions::from(&config))?;
    let written = write_artifacts(&compilation, &config)?;
    let assets = if args.no_assets {
        0
    } else {
        publish_assets(&config)?
    };

    let elapsed_ms = compilation.elapsed.as_millis() as u64;
    info!(
        notes = compilation.notes.len(),
        link_edges = written.link_edges,
        graph_edges = written.graph_edges,
        elapsed_ms,
        "build finished"
    );
    output.info(&format!(
        "Built {} notes into {}",
        compilation.notes.len(),
        config.paths.data_dir.display()
    ));

    let response = BuildResponse {
        notes: compilation.notes.len(),
        link_edges: written.link_edges,
        graph_edges: written.graph_edges,
        assets,
        elapsed_ms,
        files: written
            .files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        warnings: compilation.warnings.iter().map(|w| w.to_string()).collect(),
    };
    output.print(&response)
}
