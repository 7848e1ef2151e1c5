use anyhow::Result;
use log::info;
use serde::Serialize;

use daily_arxiv_digest::common::{format_date, setup_logging};
use daily_arxiv_digest::feed::{Language, Manifest};
use daily_arxiv_digest::render::format_dates;

use super::open_loader;
use crate::cli::DatesArgs;

#[derive(Serialize)]
struct DateEntry {
    date: String,
    languages: Vec<Language>,
}

pub fn run_dates(args: DatesArgs) -> Result<Manifest> {
    setup_logging(&args.source.log_level)?;

    let loader = open_loader(&args.source)?;
    let rt = tokio::runtime::Runtime::new()?;
    let manifest = rt.block_on(loader.discover_dates());
    info!("{} dates available", manifest.len());

    if args.json {
        let entries: Vec<DateEntry> = manifest
            .dates()
            .into_iter()
            .map(|date| DateEntry {
                date: format_date(date),
                languages: manifest.languages(date),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_dates(&manifest));
    }

    Ok(manifest)
}
