use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::common::{serialize_date, ParseStats};

/// One paper's summary as published in a daily feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperRecord {
    pub title: String,
    pub url: String,
    pub authors: Vec<String>,
    /// Never empty; the first entry is the primary category
    pub categories: Vec<String>,
    /// AI TL;DR, or the original abstract when the feed has none
    pub summary: String,
    /// Original abstract
    pub details: String,
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub id: Option<String>,
    pub motivation: String,
    pub method: String,
    pub result: String,
    pub conclusion: String,
    pub code_url: String,
    pub code_stars: u64,
    pub code_last_update: String,
}

impl PaperRecord {
    pub fn primary_category(&self) -> &str {
        // categories is non-empty for every record built by parse_line
        self.categories.first().map(String::as_str).unwrap_or_default()
    }

    /// Authors joined for display and author matching
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }

    pub fn pdf_url(&self) -> String {
        self.url.replacen("abs", "pdf", 1)
    }

    pub fn html_url(&self) -> String {
        self.url.replacen("abs", "html", 1)
    }
}

/// Feed fields are loosely typed: numbers stand in for strings, and lists
/// may hold nulls. Anything that is not text reads as absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn opt_text(value: Option<&Value>) -> Option<String> {
    value.and_then(text)
}

/// A single string or a list of strings, normalised to a list
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
        Some(other) => text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Star counts arrive as numbers, occasionally as numeric strings
fn star_count(value: &Value) -> u64 {
    let stars = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    stars.filter(|s| *s > 0.0).map_or(0, |s| s as u64)
}

#[derive(Debug, Deserialize)]
struct RawPaper {
    title: Option<Value>,
    categories: Option<Value>,
    authors: Option<Value>,
    summary: Option<Value>,
    abs: Option<Value>,
    pdf: Option<Value>,
    id: Option<Value>,
    #[serde(rename = "AI")]
    ai: Option<Value>,
    code_url: Option<Value>,
    code_stars: Option<Value>,
    code_last_update: Option<Value>,
}

impl RawPaper {
    fn into_record(self, date: Date) -> Option<PaperRecord> {
        let categories = text_list(self.categories.as_ref());
        if categories.is_empty() {
            return None;
        }

        let id = opt_text(self.id.as_ref());
        let url = opt_text(self.abs.as_ref())
            .or_else(|| opt_text(self.pdf.as_ref()))
            .or_else(|| id.as_ref().map(|id| format!("https://arxiv.org/abs/{}", id)))
            .unwrap_or_default();

        // A digest that is not an object (e.g. an error string) has no fields
        let digest = |field: &str| {
            opt_text(self.ai.as_ref().and_then(|ai| ai.get(field))).unwrap_or_default()
        };
        let details = opt_text(self.summary.as_ref()).unwrap_or_default();
        let tldr = digest("tldr");
        let summary = if tldr.is_empty() { details.clone() } else { tldr };

        Some(PaperRecord {
            title: opt_text(self.title.as_ref()).unwrap_or_default(),
            url,
            authors: text_list(self.authors.as_ref()),
            categories,
            summary,
            details,
            date,
            id,
            motivation: digest("motivation"),
            method: digest("method"),
            result: digest("result"),
            conclusion: digest("conclusion"),
            code_url: opt_text(self.code_url.as_ref()).unwrap_or_default(),
            code_stars: self.code_stars.as_ref().map_or(0, star_count),
            code_last_update: opt_text(self.code_last_update.as_ref()).unwrap_or_default(),
        })
    }
}

/// Parse a single JSONL line; `None` for invalid JSON or a record without categories
pub fn parse_line(line: &str, date: Date) -> Option<PaperRecord> {
    match serde_json::from_str::<RawPaper>(line) {
        Ok(raw) => raw.into_record(date),
        Err(e) => {
            debug!("Dropping unparsable feed line: {}", e);
            None
        }
    }
}

/// Records kept from one feed document plus line accounting
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub records: Vec<PaperRecord>,
    pub stats: ParseStats,
}

/// Parse a JSONL feed document line by line.
///
/// Blank lines are skipped; any other line that does not yield a record is
/// counted as dropped and the rest of the document is still parsed.
pub fn parse_feed(text: &str, date: Date) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        parsed.stats.lines_read += 1;

        match parse_line(line, date) {
            Some(record) => parsed.records.push(record),
            None => parsed.stats.lines_dropped += 1,
        }
    }

    parsed.stats.records_kept = parsed.records.len();
    parsed
}
