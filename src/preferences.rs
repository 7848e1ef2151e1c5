//! Stored keyword and author tags.
//!
//! Kept as a small JSON document using the dashboard's storage keys
//! (`preferredKeywords`, `preferredAuthors`) so existing exports load as-is.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::view::FilterState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "preferredKeywords", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "preferredAuthors", default)]
    pub authors: Vec<String>,
}

fn add_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn remove_value(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|v| v != value.trim());
    list.len() != before
}

impl Preferences {
    /// Load stored preferences. A missing file gives empty preferences, and so
    /// does an unreadable or malformed one (with a warning).
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read preferences {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Ignoring malformed preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences: {}", path.display()))?;
        Ok(())
    }

    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        add_unique(&mut self.keywords, keyword)
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        remove_value(&mut self.keywords, keyword)
    }

    pub fn add_author(&mut self, author: &str) -> bool {
        add_unique(&mut self.authors, author)
    }

    pub fn remove_author(&mut self, author: &str) -> bool {
        remove_value(&mut self.authors, author)
    }

    /// Initial filter with every stored tag active
    pub fn filter_state(&self) -> FilterState {
        FilterState::with_tags(&self.keywords, &self.authors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/preferences.json");

        let mut prefs = Preferences::default();
        assert!(prefs.add_keyword("diffusion"));
        assert!(prefs.add_keyword("agents"));
        assert!(!prefs.add_keyword("diffusion"));
        assert!(prefs.add_author("Yann LeCun"));
        prefs.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("preferredKeywords"));
        assert_eq!(Preferences::load(&path), prefs);
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        assert_eq!(Preferences::load(&dir.path().join("absent.json")), Preferences::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert_eq!(Preferences::load(&bad), Preferences::default());
    }

    #[test]
    fn test_partial_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"preferredAuthors":["Hinton"]}"#).unwrap();

        let prefs = Preferences::load(&path);
        assert!(prefs.keywords.is_empty());
        assert_eq!(prefs.authors, vec!["Hinton".to_string()]);
    }

    #[test]
    fn test_remove_and_filter_state() {
        let mut prefs = Preferences::default();
        prefs.add_keyword("llm");
        prefs.add_keyword("rl");
        assert!(prefs.remove_keyword("llm"));
        assert!(!prefs.remove_keyword("llm"));

        let filter = prefs.filter_state();
        assert!(filter.active_keywords.contains("rl"));
        assert!(!filter.active_keywords.contains("llm"));
        assert_eq!(filter.page, 1);
    }
}
