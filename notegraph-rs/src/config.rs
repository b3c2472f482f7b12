//! Build configuration.
//!
//! Values are layered: defaults, then a TOML file, then environment
//! variables, then whatever the CLI overrides on the loaded struct.

use crate::error::{NotegraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "notegraph.toml";

/// Vault identity written to `vault.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    pub name: String,
    /// Display label; derived from `name` when absent.
    pub label: Option<String>,
    pub default_lang: String,
    pub build_version: String,
}

impl Default for VaultSection {
    fn default() -> Self {
        Self {
            name: "demo".to_string(),
            label: None,
            default_lang: "en".to_string(),
            build_version: "1.0.0".to_string(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Markdown source folder; `content/<vault name>` when absent.
    pub content_dir: Option<PathBuf>,
    /// Public artifacts (`vault.json`, `notes.index.json`, ...).
    pub data_dir: PathBuf,
    /// Non-public artifacts (`notes-content.json`).
    pub generated_dir: PathBuf,
    /// Where the `assets` folder is mirrored.
    pub public_vault_dir: PathBuf,
    /// URL under which `public_vault_dir` is served.
    pub asset_url_prefix: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            content_dir: None,
            data_dir: PathBuf::from("public/data"),
            generated_dir: PathBuf::from(".generated"),
            public_vault_dir: PathBuf::from("public/vault"),
            asset_url_prefix: "/vault".to_string(),
        }
    }
}

/// Complete build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault: VaultSection,
    pub paths: PathsSection,
}

impl Config {
    /// Load configuration from an explicit file, or from the first default
    /// location that exists, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(NotegraphError::ConfigError(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_locations().into_iter().find(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("notegraph").join("config.toml"));
        }
        locations
    }

    /// Apply `VAULT_NAME`, `VAULT_LABEL` and `VAULT_BUILD_VERSION`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("VAULT_NAME").filter(|v| !v.is_empty()) {
            self.vault.name = name;
        }
        if let Some(label) = lookup("VAULT_LABEL").filter(|v| !v.is_empty()) {
            self.vault.label = Some(label);
        }
        if let Some(version) = lookup("VAULT_BUILD_VERSION").filter(|v| !v.is_empty()) {
            self.vault.build_version = version;
        }
    }

    /// Display label for the vault.
    pub fn vault_label(&self) -> String {
        match &self.vault.label {
            Some(label) => label.clone(),
            None if self.vault.name == "demo" => "Vault Demo".to_string(),
            None => self.vault.name.clone(),
        }
    }

    /// Markdown source folder.
    pub fn content_dir(&self) -> PathBuf {
        self.paths
            .content_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("content").join(&self.vault.name))
    }

    /// Re-root every relative output path under `root`.
    pub fn rebase_outputs(&mut self, root: &Path) {
        self.paths.data_dir = root.join(&self.paths.data_dir);
        self.paths.generated_dir = root.join(&self.paths.generated_dir);
        self.paths.public_vault_dir = root.join(&self.paths.public_vault_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.vault.name, "demo");
        assert_eq!(config.vault_label(), "Vault Demo");
        assert_eq!(config.content_dir(), PathBuf::from("content/demo"));
        assert_eq!(config.paths.asset_url_prefix, "/vault");
    }

    #[test]
    fn test_label_follows_name() {
        let mut config = Config::default();
        config.vault.name = "garden".to_string();
        assert_eq!(config.vault_label(), "garden");
        assert_eq!(config.content_dir(), PathBuf::from("content/garden"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("VAULT_NAME", "kb"), ("VAULT_BUILD_VERSION", "2.1.0")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.vault.name, "kb");
        assert_eq!(config.vault.build_version, "2.1.0");
        assert_eq!(config.vault.label, None);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notegraph.toml");
        std::fs::write(
            &path,
            "[vault]\nname = \"kb\"\n\n[paths]\ncontent_dir = \"notes\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.vault.name, "kb");
        assert_eq!(config.vault.default_lang, "en");
        assert_eq!(config.content_dir(), PathBuf::from("notes"));
        assert_eq!(config.paths.data_dir, PathBuf::from("public/data"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(NotegraphError::ConfigError(_))));
    }
}
