use log::{debug, info, warn};
use std::time::Instant;
use time::Date;

use super::{feed_path, parse_feed, FeedError, FeedSource, Fetched, Language, Manifest, PaperRecord};
use crate::common::{format_date, format_elapsed, ParseStats};

/// Path of the published file list, relative to the source root
pub const MANIFEST_PATH: &str = "assets/file-list.txt";

/// One date's feed in one language
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub date: Date,
    pub language: Language,
    pub records: Vec<PaperRecord>,
    pub stats: ParseStats,
}

/// What a date load ended in, as shown to the user
#[derive(Debug, Clone)]
pub enum FeedOutcome {
    Loaded(LoadedFeed),
    /// Nothing published for the date: 404 or an empty document
    NoData,
    /// Any other failure, with the underlying error text
    Failed(String),
}

impl FeedOutcome {
    pub fn from_result(result: Result<Option<LoadedFeed>, FeedError>) -> Self {
        match result {
            Ok(Some(feed)) => FeedOutcome::Loaded(feed),
            Ok(None) => FeedOutcome::NoData,
            Err(e) => FeedOutcome::Failed(e.to_string()),
        }
    }
}

/// Reads the manifest and daily feeds from a [`FeedSource`]
#[derive(Debug, Clone)]
pub struct FeedLoader {
    source: FeedSource,
}

impl FeedLoader {
    pub fn new(source: FeedSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetch and parse the manifest.
    ///
    /// Never fails: a missing or unreachable manifest yields an empty one.
    pub async fn discover_dates(&self) -> Manifest {
        match self.source.fetch(MANIFEST_PATH).await {
            Ok(Fetched::Body(text)) => {
                let manifest = Manifest::parse(&text);
                info!(
                    "Manifest lists {} dates ({})",
                    manifest.len(),
                    self.source.locate(MANIFEST_PATH)
                );
                manifest
            }
            Ok(Fetched::NotFound) => {
                warn!("Manifest not found at {}", self.source.locate(MANIFEST_PATH));
                Manifest::new()
            }
            Err(e) => {
                warn!("Error fetching manifest: {}", e);
                Manifest::new()
            }
        }
    }

    /// Fetch one feed document.
    ///
    /// `Ok(None)` means nothing is published for that date and language.
    pub async fn load_feed(&self, date: Date, language: Language) -> Result<Option<LoadedFeed>, FeedError> {
        let start = Instant::now();
        let path = feed_path(date, language);

        let text = match self.source.fetch(&path).await? {
            Fetched::Body(text) if !text.trim().is_empty() => text,
            Fetched::Body(_) | Fetched::NotFound => {
                debug!("No papers published for {} ({})", format_date(date), language);
                return Ok(None);
            }
        };

        let parsed = parse_feed(&text, date);
        info!(
            "Loaded {} papers for {} ({}) in {}",
            parsed.stats.records_kept,
            format_date(date),
            language,
            format_elapsed(start.elapsed())
        );
        if parsed.stats.lines_dropped > 0 {
            info!("  ({} lines dropped)", parsed.stats.lines_dropped);
        }

        Ok(Some(LoadedFeed {
            date,
            language,
            records: parsed.records,
            stats: parsed.stats,
        }))
    }

    /// Choose the language from the manifest, then load
    pub async fn load(&self, manifest: &Manifest, date: Date, preferred: Option<Language>) -> FeedOutcome {
        let language = manifest.select_language(date, preferred);
        FeedOutcome::from_result(self.load_feed(date, language).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_date;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn fixture() -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join(MANIFEST_PATH),
            "data/2025-01-10_AI_enhanced_Chinese.jsonl\ndata/2025-01-10_AI_enhanced_English.jsonl\ndata/2025-01-11_AI_enhanced_English.jsonl\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("data/2025-01-10_AI_enhanced_Chinese.jsonl"),
            [
                r#"{"title":"One","categories":["cs.AI"]}"#,
                r#"{"title":"Two","categories":["cs.CL","cs.AI"]}"#,
                r#"{"title":"x"}"#,
                r#"{"title":"Three","categories":"cs.AI"}"#,
            ]
            .join("\n"),
        )
        .unwrap();
        fs::write(dir.path().join("data/2025-01-11_AI_enhanced_English.jsonl"), "\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_discover_and_load() {
        let dir = fixture();
        let loader = FeedLoader::new(FeedSource::local(dir.path()));
        let manifest = loader.discover_dates().await;
        let date = parse_date("2025-01-10").unwrap();

        assert_eq!(manifest.dates().len(), 2);

        match loader.load(&manifest, date, None).await {
            FeedOutcome::Loaded(feed) => {
                assert_eq!(feed.language, Language::Chinese);
                assert_eq!(feed.records.len(), 3);
                assert_eq!(feed.stats.lines_dropped, 1);
            }
            other => panic!("expected loaded feed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_and_empty_feeds_are_no_data() {
        let dir = fixture();
        let loader = FeedLoader::new(FeedSource::local(dir.path()));
        let manifest = loader.discover_dates().await;

        let empty = parse_date("2025-01-11").unwrap();
        assert!(matches!(loader.load(&manifest, empty, None).await, FeedOutcome::NoData));

        let absent = parse_date("2025-02-01").unwrap();
        assert!(matches!(loader.load(&manifest, absent, None).await, FeedOutcome::NoData));
    }

    #[tokio::test]
    async fn test_missing_manifest_yields_no_dates() {
        let dir = tempdir().unwrap();
        let loader = FeedLoader::new(FeedSource::local(dir.path()));
        assert!(loader.discover_dates().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let dir = fixture();
        // A directory where the feed file should be cannot be read as text
        fs::create_dir_all(dir.path().join("data/2025-01-12_AI_enhanced_Chinese.jsonl")).unwrap();
        let loader = FeedLoader::new(FeedSource::local(dir.path()));
        let date = parse_date("2025-01-12").unwrap();

        match loader.load(&Manifest::new(), date, None).await {
            FeedOutcome::Failed(message) => assert!(message.contains("failed to read")),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
