use serde::Serialize;
use std::collections::BTreeMap;

/// Number of categories listed in the sidebar
pub const SIDEBAR_LIMIT: usize = 10;

/// Paper count per primary category, in category-code order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    counts: BTreeMap<String, usize>,
}

impl CategoryCounts {
    pub(crate) fn new(counts: BTreeMap<String, usize>) -> Self {
        Self { counts }
    }

    pub fn get(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// First categories by code (not by count), as shown in the sidebar
    pub fn sidebar(&self) -> Vec<(&str, usize)> {
        self.iter().take(SIDEBAR_LIMIT).collect()
    }
}
