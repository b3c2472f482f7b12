//! Broken links command implementation.

use crate::cli::args::BrokenLinksArgs;
use crate::cli::output::Output;
use crate::compiler::{CompileOptions, compile};
use crate::config::Config;
use crate::error::Result;
use crate::types::{CompileWarning, LinkKind, WarningKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub source_slug: String,
    pub target_label: String,
    /// Set when the note resolved but its heading or block did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_slug: Option<String>,
    pub kind: LinkKind,
    pub preview: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLinksResponse {
    pub count: usize,
    pub links: Vec<BrokenLink>,
    pub missing_assets: Vec<CompileWarning>,
}

pub fn broken_links(config: &Config, args: &BrokenLinksArgs, output: &Output) -> Result<()> {
    let mut config = config.clone();
    args.content.apply(&mut config);

    let compilation = compile(&CompileOptions::from(&config))?;

    let links: Vec<BrokenLink> = compilation
        .broken_links()
        .into_iter()
        .map(|link| BrokenLink {
            source_slug: link.source_slug.clone(),
            target_label: link.target_label.clone(),
            target_slug: link.target_slug.clone(),
            kind: link.kind,
            preview: link.preview.clone(),
        })
        .collect();

    let missing_assets = compilation
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::MissingAsset)
        .cloned()
        .collect();

    output.print(&BrokenLinksResponse {
        count: links.len(),
        links,
        missing_assets,
    })
}
