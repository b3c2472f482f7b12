//! Content folder discovery and document loading.

use crate::error::{NotegraphError, Result};
use crate::parser::{Frontmatter, parse_frontmatter};
use chrono::{DateTime, Utc};
use glob::glob;
use rayon::prelude::*;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Folder holding static assets; never scanned for notes.
pub const ASSETS_DIR: &str = "assets";

/// A markdown file split into frontmatter and body.
///
/// Transient: consumed by the normalizer.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the content root, `/`-separated.
    pub relative_path: String,
    /// File name without extension.
    pub file_stem: String,
    pub frontmatter: Frontmatter,
    /// Body text, trimmed.
    pub body: String,
    pub modified: DateTime<Utc>,
}

/// A content root folder.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the content folder.
    pub root: PathBuf,
}

impl Vault {
    /// Open a content root, failing if it is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(NotegraphError::ContentRootNotFound(root));
        }

        Ok(Self { root })
    }

    /// List all markdown files, relative to the root, in lexicographic order.
    ///
    /// Dotfiles, dot-directories and any `assets` directory are skipped.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/**/*.md",
            glob::Pattern::escape(&self.root.to_string_lossy())
        );

        let mut notes = Vec::new();

        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        if !is_skipped(relative) {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    warn!("glob error: {}", e);
                }
            }
        }

        notes.sort_by_key(|p| slash_path(p));
        Ok(notes)
    }

    /// Load every note, failing if there are none or if any file is unreadable.
    ///
    /// The returned order is the discovery order used for slug suffixes.
    pub fn load_documents(&self) -> Result<Vec<RawDocument>> {
        let paths = self.list_notes()?;
        if paths.is_empty() {
            return Err(NotegraphError::EmptyContentRoot(self.root.clone()));
        }

        debug!(count = paths.len(), root = %self.root.display(), "loading documents");
        paths
            .par_iter()
            .map(|relative| self.load_document(relative))
            .collect()
    }

    /// Read and split a single note.
    pub fn load_document(&self, relative: &Path) -> Result<RawDocument> {
        let path = self.root.join(relative);
        let content = std::fs::read_to_string(&path)?;
        let modified: DateTime<Utc> = std::fs::metadata(&path)?.modified()?.into();
        let (frontmatter, body) = parse_frontmatter(&content, &path)?;

        let file_stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(RawDocument {
            relative_path: slash_path(relative),
            file_stem,
            frontmatter,
            body: body.trim().to_string(),
            modified,
            path,
        })
    }
}

fn is_skipped(relative: &Path) -> bool {
    let components: Vec<_> = relative.components().collect();
    components.iter().enumerate().any(|(i, c)| match c {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            let is_dir = i + 1 < components.len();
            name.starts_with('.') || (is_dir && name == ASSETS_DIR)
        }
        _ => false,
    })
}

/// Render a relative path with `/` separators on every platform.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let result = Vault::open("/definitely/not/a/vault");
        assert!(matches!(result, Err(NotegraphError::ContentRootNotFound(_))));
    }

    #[test]
    fn test_empty_root_is_fatal() {
        let (_dir, vault) = setup(&[("readme.txt", "not a note")]);
        let result = vault.load_documents();
        assert!(matches!(result, Err(NotegraphError::EmptyContentRoot(_))));
    }

    #[test]
    fn test_list_notes_skips_hidden_and_assets() {
        let (_dir, vault) = setup(&[
            ("b.md", "B"),
            ("a.md", "A"),
            ("sub/c.md", "C"),
            (".trash/config.md", "hidden"),
            (".draft.md", "hidden"),
            ("assets/readme.md", "asset docs"),
            ("sub/assets/inner.md", "asset docs"),
        ]);

        let notes: Vec<String> = vault.list_notes().unwrap().iter().map(|p| slash_path(p)).collect();
        assert_eq!(notes, vec!["a.md", "b.md", "sub/c.md"]);
    }

    #[test]
    fn test_list_notes_orders_by_path_string() {
        let (_dir, vault) = setup(&[("a/x.md", "1"), ("a b/x.md", "2")]);
        let notes: Vec<String> = vault.list_notes().unwrap().iter().map(|p| slash_path(p)).collect();
        assert_eq!(notes, vec!["a b/x.md", "a/x.md"]);
    }

    #[test]
    fn test_load_document() {
        let (_dir, vault) = setup(&[("ideas/Grafo.md", "---\ntitle: Grafo\n---\n\n  Body text  \n")]);
        let docs = vault.load_documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].relative_path, "ideas/Grafo.md");
        assert_eq!(docs[0].file_stem, "Grafo");
        assert_eq!(docs[0].frontmatter.title.as_deref(), Some("Grafo"));
        assert_eq!(docs[0].body, "Body text");
    }

    #[test]
    fn test_invalid_frontmatter_aborts_load() {
        let (_dir, vault) = setup(&[("ok.md", "fine"), ("bad.md", "---\nx: [unclosed\n---\nbody")]);
        let result = vault.load_documents();
        assert!(matches!(result, Err(NotegraphError::InvalidFrontmatter { .. })));
    }
}
