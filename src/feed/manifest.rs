use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use time::Date;

use crate::common::{format_date, parse_date};

lazy_static! {
    // e.g. data/2025-01-10_AI_enhanced_Chinese.jsonl
    pub static ref FEED_FILE_PATTERN: Regex = Regex::new(
        r"(\d{4}-\d{2}-\d{2})_AI_enhanced_(English|Chinese)\.jsonl"
    ).unwrap();
}

/// Language variant of a daily feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Language {
    Chinese,
    English,
}

impl Language {
    /// Used when no preference is given, or the preference is unavailable
    pub const FALLBACK: Language = Language::Chinese;

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Chinese => "Chinese",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chinese" | "zh" => Ok(Language::Chinese),
            "english" | "en" => Ok(Language::English),
            other => Err(format!("unknown language '{}', expected English or Chinese", other)),
        }
    }
}

/// Dates with published feeds and the languages available for each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<Date, BTreeSet<Language>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from the published file list, one path per line.
    /// Lines not naming a feed file, or naming an impossible date, are ignored.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Manifest::new();

        for line in text.lines() {
            let Some(cap) = FEED_FILE_PATTERN.captures(line) else {
                continue;
            };
            let (Some(date), Some(language)) = (cap.get(1), cap.get(2)) else {
                continue;
            };
            let (Some(date), Ok(language)) = (parse_date(date.as_str()), language.as_str().parse())
            else {
                continue;
            };
            manifest.insert(date, language);
        }

        manifest
    }

    pub fn insert(&mut self, date: Date, language: Language) {
        self.entries.entry(date).or_default().insert(language);
    }

    /// Available dates, most recent first, without duplicates
    pub fn dates(&self) -> Vec<Date> {
        self.entries.keys().rev().copied().collect()
    }

    pub fn latest(&self) -> Option<Date> {
        self.entries.keys().next_back().copied()
    }

    pub fn contains(&self, date: Date) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn languages(&self, date: Date) -> Vec<Language> {
        self.entries
            .get(&date)
            .map(|langs| langs.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the language to request for `date`.
    ///
    /// The preference wins when published for that date, then the fallback
    /// language, then whatever is published. A date missing from the
    /// manifest gets the fallback.
    pub fn select_language(&self, date: Date, preferred: Option<Language>) -> Language {
        let Some(available) = self.entries.get(&date).filter(|langs| !langs.is_empty()) else {
            return Language::FALLBACK;
        };

        let preferred = preferred.unwrap_or(Language::FALLBACK);
        if available.contains(&preferred) {
            return preferred;
        }
        if available.contains(&Language::FALLBACK) {
            return Language::FALLBACK;
        }
        available.iter().next().copied().unwrap_or(Language::FALLBACK)
    }
}

/// Relative path of a feed document
pub fn feed_path(date: Date, language: Language) -> String {
    format!("data/{}_AI_enhanced_{}.jsonl", format_date(date), language)
}
