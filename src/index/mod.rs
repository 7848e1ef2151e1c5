pub mod counts;

pub use counts::*;

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::feed::PaperRecord;

/// Shared handle to an immutable record
pub type Paper = Arc<PaperRecord>;

/// Number of papers in the overview block
pub const FEATURED_COUNT: usize = 5;

/// Explicit ordering picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Feed date, most recent first
    Date,
    /// Title, ascending
    Title,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Title => "title",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "title" => Ok(SortMode::Title),
            other => Err(format!("unknown sort mode '{}', expected date or title", other)),
        }
    }
}

/// Papers grouped by primary category.
///
/// Buckets are keyed in byte-wise category-code order and keep the order
/// papers were inserted in.
/// Case-insensitive title order; titles differing only in case put lowercase first
fn title_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    buckets: BTreeMap<String, Vec<Paper>>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group papers by their primary category
    pub fn build<I>(papers: I) -> Self
    where
        I: IntoIterator<Item = Paper>,
    {
        let mut buckets: BTreeMap<String, Vec<Paper>> = BTreeMap::new();
        for paper in papers {
            buckets
                .entry(paper.primary_category().to_string())
                .or_default()
                .push(paper);
        }
        Self { buckets }
    }

    pub fn from_records(records: Vec<PaperRecord>) -> Self {
        Self::build(records.into_iter().map(Arc::new))
    }

    /// Papers whose primary category is `category`, in index order
    pub fn bucket(&self, category: &str) -> &[Paper] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// All buckets concatenated in category-code order
    pub fn flatten(&self) -> Vec<Paper> {
        self.buckets.values().flatten().cloned().collect()
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::new(
            self.buckets
                .iter()
                .map(|(category, papers)| (category.clone(), papers.len()))
                .collect(),
        )
    }

    /// Leading papers of the unfiltered listing
    pub fn featured(&self) -> Vec<Paper> {
        self.buckets
            .values()
            .flatten()
            .take(FEATURED_COUNT)
            .cloned()
            .collect()
    }

    /// Sort the flattened listing, then regroup into a fresh index
    pub fn resorted(&self, mode: SortMode) -> Self {
        let mut papers = self.flatten();
        match mode {
            SortMode::Date => papers.sort_by(|a, b| b.date.cmp(&a.date)),
            SortMode::Title => papers.sort_by(|a, b| title_order(&a.title, &b.title)),
        }
        Self::build(papers)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_date;
    use crate::feed::parse_line;

    fn paper(title: &str, categories: &[&str], date: &str) -> PaperRecord {
        let line = serde_json::json!({ "title": title, "categories": categories }).to_string();
        parse_line(&line, parse_date(date).unwrap()).unwrap()
    }

    fn titles(papers: &[Paper]) -> Vec<&str> {
        papers.iter().map(|p| p.title.as_str()).collect()
    }

    fn sample() -> CategoryIndex {
        CategoryIndex::from_records(vec![
            paper("b1", &["cs.LG", "cs.AI"], "2025-01-10"),
            paper("a1", &["cs.AI"], "2025-01-10"),
            paper("c1", &["stat.ML"], "2025-01-10"),
            paper("a2", &["cs.AI", "cs.CL"], "2025-01-10"),
            paper("b2", &["cs.LG"], "2025-01-10"),
        ])
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let index = sample();
        assert_eq!(index.len(), 5);
        assert_eq!(index.category_count(), 3);

        let total: usize = index.categories().map(|c| index.bucket(c).len()).sum();
        assert_eq!(total, index.len());

        // Secondary categories do not create buckets
        assert!(index.bucket("cs.CL").is_empty());
        assert_eq!(titles(index.bucket("cs.AI")), vec!["a1", "a2"]);
    }

    #[test]
    fn test_flatten_in_category_order() {
        let index = sample();
        assert_eq!(
            titles(&index.flatten()),
            vec!["a1", "a2", "b1", "b2", "c1"]
        );
        assert_eq!(index.categories().collect::<Vec<_>>(), vec!["cs.AI", "cs.LG", "stat.ML"]);
    }

    #[test]
    fn test_counts_and_sidebar() {
        let counts = sample().counts();
        assert_eq!(counts.get("cs.AI"), 2);
        assert_eq!(counts.get("cs.LG"), 2);
        assert_eq!(counts.get("stat.ML"), 1);
        assert_eq!(counts.get("math.OC"), 0);
        assert_eq!(counts.total(), 5);

        let many = CategoryIndex::from_records(
            (0..12)
                .map(|i| paper(&format!("p{}", i), &[format!("cat{:02}", 11 - i).as_str()], "2025-01-10"))
                .collect(),
        );
        let many_counts = many.counts();
        let sidebar = many_counts.sidebar();
        assert_eq!(sidebar.len(), SIDEBAR_LIMIT);
        assert_eq!(sidebar[0], ("cat00", 1));
        assert_eq!(sidebar[9], ("cat09", 1));
    }

    #[test]
    fn test_resorted_by_title_regroups() {
        let index = CategoryIndex::from_records(vec![
            paper("Zeta", &["cs.AI"], "2025-01-10"),
            paper("Alpha", &["cs.LG"], "2025-01-10"),
            paper("Beta", &["cs.AI"], "2025-01-10"),
        ]);
        let sorted = index.resorted(SortMode::Title);
        assert_eq!(titles(sorted.bucket("cs.AI")), vec!["Beta", "Zeta"]);
        assert_eq!(titles(sorted.bucket("cs.LG")), vec!["Alpha"]);
        // The original index is untouched
        assert_eq!(titles(index.bucket("cs.AI")), vec!["Zeta", "Beta"]);
    }

    #[test]
    fn test_resorted_by_title_ignores_case() {
        let index = CategoryIndex::from_records(vec![
            paper("Zebra Models", &["cs.AI"], "2025-01-10"),
            paper("mmWave Sensing", &["cs.AI"], "2025-01-10"),
            paper("Apple", &["cs.AI"], "2025-01-10"),
            paper("apple", &["cs.AI"], "2025-01-10"),
        ]);
        let sorted = index.resorted(SortMode::Title);
        assert_eq!(
            titles(sorted.bucket("cs.AI")),
            vec!["apple", "Apple", "mmWave Sensing", "Zebra Models"]
        );
    }

    #[test]
    fn test_resorted_by_date_is_stable() {
        let index = CategoryIndex::from_records(vec![
            paper("old", &["cs.AI"], "2025-01-09"),
            paper("new1", &["cs.AI"], "2025-01-10"),
            paper("new2", &["cs.AI"], "2025-01-10"),
        ]);
        let sorted = index.resorted(SortMode::Date);
        assert_eq!(titles(sorted.bucket("cs.AI")), vec!["new1", "new2", "old"]);
    }

    #[test]
    fn test_featured_takes_first_five() {
        let index = CategoryIndex::from_records(
            (0..8).map(|i| paper(&format!("p{}", i), &["cs.AI"], "2025-01-10")).collect(),
        );
        assert_eq!(titles(&index.featured()), vec!["p0", "p1", "p2", "p3", "p4"]);
        assert!(CategoryIndex::new().featured().is_empty());
    }

    #[test]
    fn test_sort_mode_from_str() {
        assert_eq!("Title".parse::<SortMode>().unwrap(), SortMode::Title);
        assert_eq!("date".parse::<SortMode>().unwrap(), SortMode::Date);
        assert!("stars".parse::<SortMode>().is_err());
    }
}
