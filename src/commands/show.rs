use anyhow::{anyhow, bail, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use time::Date;

use daily_arxiv_digest::common::{create_spinner, format_date, parse_date, setup_logging};
use daily_arxiv_digest::feed::{FeedLoader, FeedOutcome, Manifest, MANIFEST_PATH};
use daily_arxiv_digest::preferences::Preferences;
use daily_arxiv_digest::render::{format_detail, format_page, page_json};
use daily_arxiv_digest::session::{Action, Effect, LoadStatus, Session};
use daily_arxiv_digest::view::category_choice;

use super::open_loader;
use crate::cli::{OutputFormat, ShowArgs};

/// Requested date, or the latest one in the manifest
pub(crate) fn resolve_date(requested: Option<&str>, manifest: &Manifest, loader: &FeedLoader) -> Result<Date> {
    match requested {
        Some(s) => parse_date(s).ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => manifest.latest().ok_or_else(|| {
            anyhow!(
                "No dates available from {}",
                loader.source().locate(MANIFEST_PATH)
            )
        }),
    }
}

/// Select `date` and run its load to completion with a spinner
pub(crate) async fn load_date(session: &mut Session, loader: &FeedLoader, date: Date, rng: &mut StdRng) {
    let Some(Effect::LoadFeed { date, language, generation }) = session.apply(Action::SelectDate(date), rng) else {
        return;
    };

    let spinner = create_spinner(&format!("Loading {} ({})...", format_date(date), language));
    let outcome = FeedOutcome::from_result(loader.load_feed(date, language).await);
    spinner.finish_and_clear();

    session.apply(Action::FeedLoaded { generation, date, outcome }, rng);
}

async fn run_show_async(args: ShowArgs, loader: FeedLoader, preferences: Preferences) -> Result<Session> {
    let manifest = loader.discover_dates().await;
    let date = resolve_date(args.date.as_deref(), &manifest, &loader)?;
    if !manifest.is_empty() && !manifest.contains(date) {
        warn!("{} is not listed in the manifest", format_date(date));
    }

    let mut rng = StdRng::from_entropy();
    let mut session = Session::new(manifest, &preferences, args.source.language);

    for keyword in &args.keyword {
        if !session.filter().active_keywords.contains(keyword) {
            session.apply(Action::ToggleKeyword(keyword.clone()), &mut rng);
        }
    }
    for author in &args.author {
        if !session.filter().active_authors.contains(author) {
            session.apply(Action::ToggleAuthor(author.clone()), &mut rng);
        }
    }
    if let Some(category) = &args.category {
        session.apply(Action::SelectCategory(category_choice(category)), &mut rng);
    }
    if let Some(search) = &args.search {
        session.apply(Action::SetSearchText(search.clone()), &mut rng);
    }
    if let Some(mode) = args.sort {
        session.apply(Action::SetSortMode(mode), &mut rng);
    }

    load_date(&mut session, &loader, date, &mut rng).await;

    if let LoadStatus::Failed { message, .. } = session.status() {
        bail!("Loading data failed for {}: {}", format_date(date), message);
    }

    if args.page != 1 {
        session.apply(Action::SetPage(args.page), &mut rng);
        if session.filter().page != args.page {
            warn!(
                "Page {} is out of range (1-{}), showing page 1",
                args.page,
                session.page_count().max(1)
            );
        }
    }

    if let Some(n) = args.detail {
        if n == 0 || n > session.filtered().len() {
            bail!("No paper #{} ({} papers listed)", n, session.filtered().len());
        }
        session.apply(Action::SelectPaper(n - 1), &mut rng);
    }

    Ok(session)
}

pub fn run_show(args: ShowArgs) -> Result<Session> {
    setup_logging(&args.source.log_level)?;

    let loader = open_loader(&args.source)?;
    let preferences = if args.no_preferences {
        Preferences::default()
    } else {
        Preferences::load(&args.source.prefs)
    };
    info!(
        "Stored tags: {} keywords, {} authors",
        preferences.keywords.len(),
        preferences.authors.len()
    );

    let format = args.format;
    let rt = tokio::runtime::Runtime::new()?;
    let session = rt.block_on(run_show_async(args, loader, preferences))?;

    match (format, session.selected()) {
        (OutputFormat::Json, Some((_, paper))) => println!("{}", serde_json::to_string_pretty(paper.as_ref())?),
        (OutputFormat::Json, None) => println!("{}", page_json(&session)?),
        (OutputFormat::Text, Some((index, paper))) => {
            print!("{}", format_detail(paper, index, session.filtered().len()))
        }
        (OutputFormat::Text, None) => print!("{}", format_page(&session)),
    }

    Ok(session)
}
