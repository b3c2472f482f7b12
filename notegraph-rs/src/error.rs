//! Error types and exit codes for notegraph.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONTENT_ROOT_INVALID: i32 = 2;
    pub const INVALID_FRONTMATTER: i32 = 3;
    pub const NOTE_NOT_FOUND: i32 = 4;
    pub const ARTIFACT_NOT_FOUND: i32 = 5;
}

/// Main error type for compilation and search.
///
/// Only fatal conditions live here. Broken links and missing assets are
/// reported as [`crate::types::CompileWarning`] values on the compilation.
#[derive(Error, Debug)]
pub enum NotegraphError {
    #[error("Content root not found: {0}")]
    ContentRootNotFound(PathBuf),

    #[error("Content root contains no markdown notes: {0}")]
    EmptyContentRoot(PathBuf),

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Invalid date '{value}' in {path}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Artifact not found: {0} (run `notegraph build` first)")]
    ArtifactNotFound(PathBuf),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),


    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl NotegraphError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            NotegraphError::ContentRootNotFound(_) | NotegraphError::EmptyContentRoot(_) => {
                exit_code::CONTENT_ROOT_INVALID
            }
            NotegraphError::InvalidFrontmatter { .. } | NotegraphError::InvalidDate { .. } => {
                exit_code::INVALID_FRONTMATTER
            }
            NotegraphError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            NotegraphError::ArtifactNotFound(_) => exit_code::ARTIFACT_NOT_FOUND,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for notegraph operations.
pub type Result<T> = std::result::Result<T, NotegraphError>;
