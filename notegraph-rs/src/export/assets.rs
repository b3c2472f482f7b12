//! Static asset references and publishing.

use crate::config::Config;
use crate::error::Result;
use crate::parser::is_asset_target;
use crate::vault::ASSETS_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An asset embed target, located on disk and on the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Path relative to the content root, always under `assets/`.
    pub source_path: String,
    /// URL the rendered page should load the asset from.
    pub public_url: String,
}

/// Maps wikilink targets to assets for one content root.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    root: PathBuf,
    url_prefix: String,
}

impl AssetLocator {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Locate an asset target, or `None` if the target is not an image.
    pub fn locate(&self, target: &str) -> Option<AssetRef> {
        if !is_asset_target(target) {
            return None;
        }

        let normalized = target.trim().replace('\\', "/");
        let prefix = format!("{}/", ASSETS_DIR);
        let source_path = if let Some(rest) = normalized.strip_prefix("./") {
            if rest.starts_with(&prefix) {
                rest.to_string()
            } else {
                format!("{}{}", prefix, normalized)
            }
        } else if normalized.starts_with(&prefix) {
            normalized
        } else {
            format!("{}{}", prefix, normalized)
        };

        let encoded: Vec<String> = source_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        Some(AssetRef {
            public_url: format!("{}/{}", self.url_prefix, encoded.join("/")),
            source_path,
        })
    }

    /// Whether the asset file exists under the content root.
    pub fn exists(&self, asset: &AssetRef) -> bool {
        self.root.join(&asset.source_path).is_file()
    }
}

/// Mirror `<content>/assets` into `<public_vault_dir>/assets`.
///
/// The target is always removed first; it is left absent when the content
/// root has no assets folder. Returns the number of files copied.
pub fn publish_assets(config: &Config) -> Result<usize> {
    let source = config.content_dir().join(ASSETS_DIR);
    let target = config.paths.public_vault_dir.join(ASSETS_DIR);

    if target.exists() {
        fs::remove_dir_all(&target)?;
    }

    if !source.is_dir() {
        debug!(source = %source.display(), "no assets folder, nothing to publish");
        return Ok(0);
    }

    copy_dir(&source, &target)
}

fn copy_dir(source: &Path, target: &Path) -> Result<usize> {
    fs::create_dir_all(target)?;
    let mut copied = 0;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let from = entry.path();
        let to = target.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copied += copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
            copied += 1;
        }
    }

    Ok(copied)
}
