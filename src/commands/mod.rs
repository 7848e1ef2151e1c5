pub mod browse;
pub mod dates;
pub mod prefs;
pub mod show;
pub mod stats;

pub use browse::run_browse;
pub use dates::run_dates;
pub use prefs::run_prefs;
pub use show::run_show;
pub use stats::run_stats;

use anyhow::Result;
use log::info;

use daily_arxiv_digest::feed::{FeedLoader, FeedSource};

use crate::cli::SourceArgs;

/// Build a loader for the configured base URL, or the local data directory
pub fn open_loader(args: &SourceArgs) -> Result<FeedLoader> {
    let source = match &args.base_url {
        Some(url) => FeedSource::http(url)?,
        None => FeedSource::local(&args.data_dir),
    };
    info!("Reading digests from {}", source.locate(""));
    Ok(FeedLoader::new(source))
}
