use serde::Serialize;

use crate::index::SortMode;

/// Papers per page
pub const PAGE_SIZE: usize = 20;

/// Order-preserving set of tags toggled on and off individually
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `tag`; returns whether it is active afterwards
    pub fn toggle(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            let tag = tag.as_ref();
            if !tag.is_empty() && !set.contains(tag) {
                set.tags.push(tag.to_string());
            }
        }
        set
    }
}

/// User-driven selection over the current index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// `None` shows every category
    pub selected_category: Option<String>,
    pub active_keywords: TagSet,
    pub active_authors: TagSet,
    pub search_query: String,
    pub sort_mode: Option<SortMode>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_category: None,
            active_keywords: TagSet::new(),
            active_authors: TagSet::new(),
            search_query: String::new(),
            sort_mode: None,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter seeded with stored keyword and author tags, all active
    pub fn with_tags<K, A>(keywords: K, authors: A) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            active_keywords: keywords.into_iter().collect(),
            active_authors: authors.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Trimmed search text, `None` when blank.
    ///
    /// Matching uses this trimmed form too, so surrounding whitespace in the
    /// input never changes which papers rise to the top.
    pub fn query(&self) -> Option<&str> {
        let q = self.search_query.trim();
        (!q.is_empty()).then_some(q)
    }
}

/// Map a category choice to the filter's representation; "all" and "" mean no filter
pub fn category_choice(choice: &str) -> Option<String> {
    let choice = choice.trim();
    if choice.is_empty() || choice.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(choice.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_set_toggle_preserves_order() {
        let mut tags = TagSet::new();
        assert!(tags.toggle("llm"));
        assert!(tags.toggle("diffusion"));
        assert!(tags.toggle("agents"));
        assert!(!tags.toggle("diffusion"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["llm", "agents"]);
        assert!(tags.toggle("diffusion"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["llm", "agents", "diffusion"]);
    }

    #[test]
    fn test_tag_set_from_iter_dedups() {
        let tags: TagSet = ["a", "b", "a", "", "c"].into_iter().collect();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_query_trimmed() {
        let mut filter = FilterState::new();
        assert_eq!(filter.query(), None);
        filter.search_query = "   ".to_string();
        assert_eq!(filter.query(), None);
        filter.search_query = "  graph  ".to_string();
        assert_eq!(filter.query(), Some("graph"));
    }

    #[test]
    fn test_category_choice() {
        assert_eq!(category_choice("all"), None);
        assert_eq!(category_choice("ALL"), None);
        assert_eq!(category_choice(""), None);
        assert_eq!(category_choice("cs.AI"), Some("cs.AI".to_string()));
    }

    #[test]
    fn test_defaults() {
        let filter = FilterState::with_tags(["transformer"], Vec::<String>::new());
        assert_eq!(filter.page, 1);
        assert_eq!(filter.page_size, PAGE_SIZE);
        assert!(filter.active_keywords.contains("transformer"));
        assert!(filter.active_authors.is_empty());
    }
}
