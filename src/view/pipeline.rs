use serde::Serialize;

use super::FilterState;
use crate::index::{CategoryIndex, Paper};

/// One page of the filtered listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub papers: Vec<Paper>,
    /// Papers across all pages
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
}

/// Move items matching `pred` ahead of the rest, keeping order within both groups
pub fn stable_partition<T, F>(items: Vec<T>, pred: F) -> Vec<T>
where
    F: FnMut(&T) -> bool,
{
    let (mut matched, rest): (Vec<T>, Vec<T>) = items.into_iter().partition(pred);
    matched.extend(rest);
    matched
}

/// Stage 1: one category's bucket, or every bucket in category order
pub fn select_category(index: &CategoryIndex, category: Option<&str>) -> Vec<Paper> {
    match category {
        Some(category) => index.bucket(category).to_vec(),
        None => index.flatten(),
    }
}

/// Case-insensitive keyword match on title and TL;DR, or author match on the author line.
/// Tags must already be lowercase.
pub fn matches_tags(paper: &Paper, keywords: &[String], authors: &[String]) -> bool {
    if !keywords.is_empty() {
        let haystack = format!("{} {}", paper.title, paper.summary).to_lowercase();
        if keywords.iter().any(|k| haystack.contains(k.as_str())) {
            return true;
        }
    }
    if !authors.is_empty() {
        let haystack = paper.authors_joined().to_lowercase();
        if authors.iter().any(|a| haystack.contains(a.as_str())) {
            return true;
        }
    }
    false
}

/// Case-insensitive search over title, authors and TL;DR. `query` must be lowercase.
pub fn matches_query(paper: &Paper, query: &str) -> bool {
    format!("{} {} {}", paper.title, paper.authors_joined(), paper.summary)
        .to_lowercase()
        .contains(query)
}

/// Stages 1-3: category selection, tag re-rank, text-search re-rank
pub fn filtered(index: &CategoryIndex, filter: &FilterState) -> Vec<Paper> {
    let mut papers = select_category(index, filter.selected_category.as_deref());

    if !filter.active_keywords.is_empty() || !filter.active_authors.is_empty() {
        let keywords: Vec<String> = filter.active_keywords.iter().map(str::to_lowercase).collect();
        let authors: Vec<String> = filter.active_authors.iter().map(str::to_lowercase).collect();
        papers = stable_partition(papers, |p| matches_tags(p, &keywords, &authors));
    }

    if let Some(query) = filter.query() {
        let query = query.to_lowercase();
        papers = stable_partition(papers, |p| matches_query(p, &query));
    }

    papers
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Slice out 1-based `page`; empty past the end
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Full pipeline down to the current page
pub fn view(index: &CategoryIndex, filter: &FilterState) -> PageView {
    let papers = filtered(index, filter);
    page_of(&papers, filter)
}

/// Paginate an already filtered sequence
pub fn page_of(papers: &[Paper], filter: &FilterState) -> PageView {
    let page = filter.page.max(1);
    PageView {
        papers: paginate(papers, page, filter.page_size).to_vec(),
        total: papers.len(),
        page,
        page_count: page_count(papers.len(), filter.page_size),
        page_size: filter.page_size,
    }
}
