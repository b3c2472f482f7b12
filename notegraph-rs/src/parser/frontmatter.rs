//! YAML frontmatter parsing into known fields plus a property bag.

use crate::error::{NotegraphError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Keys consumed by [`Frontmatter`] itself, compared case-insensitively.
/// Every other top-level key is folded into `properties`.
pub const RESERVED_KEYS: &[&str] = &["title", "aliases", "tags", "properties", "updatedat"];

/// Frontmatter extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: Option<&'a str>,
    /// The content after the frontmatter.
    pub content: &'a str,
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        content,
    };

    let yaml_start = if content.starts_with("---\n") {
        4
    } else if content.starts_with("---\r\n") {
        5
    } else {
        return no_frontmatter;
    };

    let remaining = &content[yaml_start..];

    // An empty block closes immediately on the next line.
    let closing = if remaining.starts_with("---") {
        Some(0)
    } else {
        remaining
            .find("\n---\n")
            .or_else(|| remaining.find("\n---\r\n"))
            .map(|pos| pos + 1)
            .or_else(|| remaining.ends_with("\n---").then(|| remaining.len() - 3))
    };

    let Some(close) = closing else {
        return no_frontmatter;
    };

    let yaml = remaining[..close].trim_end_matches(['\n', '\r']);
    let after = &remaining[close + 3..];
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    FrontmatterSplit {
        yaml: Some(yaml),
        content: body,
    }
}

/// Typed view of a note's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    /// Raw `updatedAt` value, normalized later.
    pub updated_at: Option<String>,
    /// Explicit `properties` entries merged with non-reserved keys.
    pub properties: BTreeMap<String, String>,
}

impl Frontmatter {
    /// Build the typed view from a parsed YAML mapping.
    pub fn from_mapping(map: &serde_yaml::Mapping) -> Self {
        let get = |key: &str| map.get(key);

        let title = get("title")
            .filter(|v| !v.is_null())
            .map(|v| format_value(v).trim().to_string())
            .filter(|t| !t.is_empty());

        let mut properties = BTreeMap::new();
        if let Some(Value::Mapping(explicit)) = get("properties") {
            for (key, value) in explicit {
                properties.insert(format_value(key), format_value(value));
            }
        }
        for (key, value) in map {
            let key = format_value(key);
            if RESERVED_KEYS.contains(&key.to_lowercase().as_str()) {
                continue;
            }
            properties.insert(key, format_value(value));
        }

        Self {
            title,
            aliases: get("aliases").map(normalize_list).unwrap_or_default(),
            tags: get("tags").map(normalize_list).unwrap_or_default(),
            updated_at: get("updatedAt")
                .filter(|v| !v.is_null())
                .map(format_value)
                .filter(|v| !v.trim().is_empty()),
            properties,
        }
    }
}

/// Split `content` and parse its frontmatter.
///
/// Returns the typed frontmatter (empty when absent) and the body.
pub fn parse_frontmatter<'a>(content: &'a str, path: &Path) -> Result<(Frontmatter, &'a str)> {
    let split = split_frontmatter(content);
    let Some(yaml) = split.yaml else {
        return Ok((Frontmatter::default(), split.content));
    };

    let invalid = |message: String| NotegraphError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
    let frontmatter = match value {
        Value::Null => Frontmatter::default(),
        Value::Mapping(map) => Frontmatter::from_mapping(&map),
        other => {
            return Err(invalid(format!(
                "expected a mapping, found {}",
                format_value(&other)
            )));
        }
    };

    Ok((frontmatter, split.content))
}

/// Render a YAML value as a flat string.
///
/// Sequences join with `, `; mappings become compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Mapping(_) => serde_json::to_string(value)
            .or_else(|_| serde_yaml::to_string(value).map(|s| s.trim().to_string()))
            .unwrap_or_default(),
        Value::Tagged(tagged) => format_value(&tagged.value),
    }
}

/// Accept either a list or a comma-separated string; trim and drop empties.
pub fn normalize_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items.iter().map(format_value).collect(),
        other => format_value(other).split(',').map(str::to_string).collect(),
    };

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
