//! Notegraph CLI entry point.

use clap::Parser;
use notegraph::cli::args::{Cli, Commands};
use notegraph::cli::output::Output;
use notegraph::cli::{build, links, resolve, search, tags};
use notegraph::config::Config;
use notegraph::error::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notegraph={}", cli.log_level())));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::Build(args) => build::run(&config, args, &output),
        Commands::Search(args) => search::run(&config, args, &output),
        Commands::Tags(args) => tags::run(&config, args, &output),
        Commands::Resolve(args) => resolve::run(&config, args, &output),
        Commands::BrokenLinks(args) => links::broken_links(&config, args, &output),
    }
}
