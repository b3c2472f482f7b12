//! CLI command implementations.

pub mod args;
pub mod output;

pub mod build;
pub mod links;
pub mod resolve;
pub mod search;
pub mod tags;

pub use args::{Cli, Commands};
pub use output::Output;
