//! Plain-text and JSON rendering of session state for the terminal.

use anyhow::Result;
use serde::Serialize;

use crate::common::{format_date, OverviewStats};
use crate::feed::{Manifest, PaperRecord};
use crate::index::{CategoryCounts, Paper};
use crate::session::{LoadStatus, Session};
use crate::view::PageView;

const SUMMARY_WIDTH: usize = 240;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// One listing entry; `position` is 1-based within the filtered sequence
pub fn format_card(position: usize, paper: &PaperRecord) -> String {
    let mut out = format!("[{}] {}\n", position, paper.title);
    if !paper.authors.is_empty() {
        out.push_str(&format!("    {}\n", paper.authors_joined()));
    }
    out.push_str(&format!(
        "    {} | {}\n",
        paper.categories.join(", "),
        format_date(paper.date)
    ));
    if !paper.summary.is_empty() {
        out.push_str(&format!("    {}\n", truncate(&paper.summary, SUMMARY_WIDTH)));
    }
    out
}

/// `page X / Y (N papers)`
pub fn format_footer(page: &PageView) -> String {
    format!(
        "page {} / {} ({} papers)",
        page.page,
        page.page_count.max(1),
        page.total
    )
}

/// Status line shown instead of a listing, if any
pub fn status_message(status: &LoadStatus) -> Option<String> {
    match status {
        LoadStatus::Idle => Some("No date selected.".to_string()),
        LoadStatus::Loading { date } => Some(format!("Loading papers for {}...", format_date(*date))),
        LoadStatus::Ready { .. } => None,
        LoadStatus::NoData { .. } => Some("No papers found for this date.".to_string()),
        LoadStatus::Failed { message, .. } => Some(format!(
            "Loading data failed. Please retry.\nError: {}",
            message
        )),
    }
}

pub fn format_page(session: &Session) -> String {
    let mut out = String::new();
    if let Some(date) = session.date() {
        let language = session.language().map(|l| format!(" ({})", l)).unwrap_or_default();
        out.push_str(&format!("== {}{} ==\n", format_date(date), language));
    }

    if let Some(message) = status_message(session.status()) {
        out.push_str(&message);
        out.push('\n');
        return out;
    }

    let page = session.page();
    if page.total == 0 {
        out.push_str("No paper found.\n");
        return out;
    }

    let offset = (page.page - 1) * page.page_size;
    for (i, paper) in page.papers.iter().enumerate() {
        out.push_str(&format_card(offset + i + 1, paper));
    }
    out.push_str(&format_footer(&page));
    out.push('\n');
    out
}

/// Category dropdown: total first, then every category with its count
pub fn format_category_options(counts: &CategoryCounts) -> String {
    let mut out = format!("all ({})\n", counts.total());
    for (category, count) in counts.iter() {
        out.push_str(&format!("{} ({})\n", category, count));
    }
    out
}

/// Sidebar list, marking the selected category
pub fn format_sidebar(counts: &CategoryCounts, selected: Option<&str>) -> String {
    counts
        .sidebar()
        .into_iter()
        .map(|(category, count)| {
            let marker = if selected == Some(category) { '*' } else { ' ' };
            format!("{} {:<16} {}\n", marker, category, count)
        })
        .collect()
}

/// Detail view; `index` is 0-based within `total` filtered papers
pub fn format_detail(paper: &PaperRecord, index: usize, total: usize) -> String {
    let mut out = format!("{}\n", paper.title);
    out.push_str(&format!("Authors: {}\n", paper.authors_joined()));
    out.push_str(&format!("Categories: {}\n", paper.categories.join(", ")));
    out.push_str(&format!("Date: {}\n", format_date(paper.date)));
    out.push_str(&format!("\nTL;DR\n{}\n", paper.summary));

    for (heading, text) in [
        ("Motivation", &paper.motivation),
        ("Method", &paper.method),
        ("Result", &paper.result),
        ("Conclusion", &paper.conclusion),
    ] {
        if !text.is_empty() {
            out.push_str(&format!("\n{}\n{}\n", heading, text));
        }
    }
    if !paper.details.is_empty() {
        out.push_str(&format!("\nAbstract\n{}\n", paper.details));
    }

    out.push('\n');
    if !paper.url.is_empty() {
        out.push_str(&format!("Paper: {}\n", paper.url));
        out.push_str(&format!("PDF:   {}\n", paper.pdf_url()));
        out.push_str(&format!("HTML:  {}\n", paper.html_url()));
    }
    if !paper.code_url.is_empty() {
        let mut code = format!("Code:  {} ({} stars", paper.code_url, paper.code_stars);
        if !paper.code_last_update.is_empty() {
            code.push_str(&format!(", updated {}", paper.code_last_update));
        }
        code.push_str(")\n");
        out.push_str(&code);
    }
    out.push_str(&format!("{} / {}\n", index + 1, total));
    out
}

pub fn format_overview(stats: &OverviewStats, featured: &[Paper]) -> String {
    let mut out = format!(
        "Papers: {}\nCategories: {}\nAvailable dates: {}\nLatest: {}\n",
        stats.total_papers,
        stats.total_categories,
        stats.available_dates,
        stats.latest_date.as_deref().unwrap_or("-")
    );
    if !featured.is_empty() {
        out.push_str("\nFeatured\n");
        for (i, paper) in featured.iter().enumerate() {
            out.push_str(&format_card(i + 1, paper));
        }
    }
    out
}

/// One line per available date with its languages, most recent first
pub fn format_dates(manifest: &Manifest) -> String {
    if manifest.is_empty() {
        return "No dates available.\n".to_string();
    }
    manifest
        .dates()
        .into_iter()
        .map(|date| {
            let languages: Vec<&str> = manifest.languages(date).iter().map(|l| l.as_str()).collect();
            format!("{}  {}\n", format_date(date), languages.join(", "))
        })
        .collect()
}

#[derive(Serialize)]
struct PageDocument<'a> {
    date: Option<String>,
    language: Option<String>,
    status: &'static str,
    message: Option<String>,
    categories: CategoryCounts,
    #[serde(flatten)]
    page: &'a PageView,
}

/// Machine-readable page for scripting
pub fn page_json(session: &Session) -> Result<String> {
    let page = session.page();
    let status = match session.status() {
        LoadStatus::Idle => "idle",
        LoadStatus::Loading { .. } => "loading",
        LoadStatus::Ready { .. } => "ready",
        LoadStatus::NoData { .. } => "no_data",
        LoadStatus::Failed { .. } => "failed",
    };
    let doc = PageDocument {
        date: session.date().map(format_date),
        language: session.language().map(|l| l.to_string()),
        status,
        message: status_message(session.status()),
        categories: session.counts(),
        page: &page,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_date;
    use crate::feed::parse_line;

    fn record(line: &str) -> PaperRecord {
        parse_line(line, parse_date("2025-01-10").unwrap()).unwrap()
    }

    #[test]
    fn test_card_and_truncation() {
        let long = "x".repeat(300);
        let line = serde_json::json!({
            "title": "A Transformer Study",
            "categories": ["cs.CL", "cs.AI"],
            "authors": ["Ada", "Alan"],
            "summary": long,
        })
        .to_string();
        let card = format_card(3, &record(&line));
        assert!(card.starts_with("[3] A Transformer Study\n"));
        assert!(card.contains("    Ada, Alan\n"));
        assert!(card.contains("cs.CL, cs.AI | 2025-01-10"));
        assert!(card.contains(&format!("{}...", "x".repeat(SUMMARY_WIDTH))));
    }

    #[test]
    fn test_detail_sections_and_links() {
        let paper = record(
            r#"{"title":"T","categories":["cs.AI"],"authors":["A"],"summary":"abs","abs":"https://arxiv.org/abs/2501.1","AI":{"tldr":"short","method":"m"},"code_url":"https://github.com/a/b","code_stars":5}"#,
        );
        let detail = format_detail(&paper, 1, 4);
        assert!(detail.contains("TL;DR\nshort\n"));
        assert!(detail.contains("Method\nm\n"));
        assert!(!detail.contains("Motivation"));
        assert!(detail.contains("Abstract\nabs\n"));
        assert!(detail.contains("PDF:   https://arxiv.org/pdf/2501.1"));
        assert!(detail.contains("Code:  https://github.com/a/b (5 stars)"));
        assert!(detail.ends_with("2 / 4\n"));
    }

    #[test]
    fn test_status_messages() {
        let date = parse_date("2025-01-10").unwrap();
        assert_eq!(
            status_message(&LoadStatus::NoData { date }).as_deref(),
            Some("No papers found for this date.")
        );
        let failed = status_message(&LoadStatus::Failed { date, message: "HTTP 500".into() }).unwrap();
        assert!(failed.contains("Error: HTTP 500"));
        assert!(status_message(&LoadStatus::Ready { papers: 1, dropped: 0 }).is_none());
    }

    #[test]
    fn test_dates_listing() {
        let manifest = Manifest::parse(
            "2025-01-09_AI_enhanced_English.jsonl\n2025-01-10_AI_enhanced_Chinese.jsonl\n2025-01-10_AI_enhanced_English.jsonl",
        );
        assert_eq!(
            format_dates(&manifest),
            "2025-01-10  Chinese, English\n2025-01-09  English\n"
        );
        assert_eq!(format_dates(&Manifest::new()), "No dates available.\n");
    }
}
