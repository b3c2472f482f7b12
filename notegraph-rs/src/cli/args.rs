//! CLI argument definitions using clap.

use crate::config::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notegraph")]
#[command(author, version, about = "Compile a markdown vault into a linked note graph", long_about = None)]
pub struct Cli {
    /// Config file (default: ./notegraph.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log level when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile the content folder and write all artifacts
    Build(BuildArgs),

    /// Search compiled notes
    Search(SearchArgs),

    /// Show tag usage of compiled notes
    Tags(TagsArgs),

    /// Resolve a note name, alias or slug the way wikilinks do
    Resolve(ResolveArgs),

    /// Compile without writing and list every unresolved link
    #[command(name = "broken-links")]
    BrokenLinks(BrokenLinksArgs),
}

/// Overrides for the content folder.
#[derive(Args, Debug, Clone, Default)]
pub struct ContentArgs {
    /// Content folder (overrides config)
    #[arg(long)]
    pub content: Option<PathBuf>,
}

/// Overrides for output locations.
#[derive(Args, Debug, Clone, Default)]
pub struct OutRootArgs {
    /// Directory all relative output paths are resolved against
    #[arg(long)]
    pub out_root: Option<PathBuf>,
}

impl ContentArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(content) = &self.content {
            config.paths.content_dir = Some(content.clone());
        }
    }
}

impl OutRootArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.out_root {
            config.rebase_outputs(root);
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub out: OutRootArgs,

    /// Skip mirroring the assets folder
    #[arg(long)]
    pub no_assets: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query: words, "phrases", tag:#name, and -negations
    pub query: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    #[command(flatten)]
    pub out: OutRootArgs,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Maximum number of tags
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only list notes carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    #[command(flatten)]
    pub out: OutRootArgs,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Name to resolve
    pub name: String,

    #[command(flatten)]
    pub content: ContentArgs,
}

#[derive(Args, Debug)]
pub struct BrokenLinksArgs {
    #[command(flatten)]
    pub content: ContentArgs,
}
