use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use daily_arxiv_digest::common::{setup_logging, OverviewStats};
use daily_arxiv_digest::preferences::Preferences;
use daily_arxiv_digest::render::{format_category_options, format_overview, format_sidebar};
use daily_arxiv_digest::session::Session;

use super::open_loader;
use super::show::load_date;
use crate::cli::StatsArgs;

pub fn run_stats(args: StatsArgs) -> Result<OverviewStats> {
    setup_logging(&args.source.log_level)?;

    let loader = open_loader(&args.source)?;
    let rt = tokio::runtime::Runtime::new()?;

    let session = rt.block_on(async {
        let manifest = loader.discover_dates().await;
        let latest = manifest.latest();
        let mut session = Session::new(manifest, &Preferences::default(), args.source.language);
        if let Some(date) = latest {
            let mut rng = StdRng::from_entropy();
            load_date(&mut session, &loader, date, &mut rng).await;
        }
        session
    });

    let stats = session.overview();
    print!("{}", format_overview(&stats, &session.index().featured()));

    let counts = session.counts();
    if !counts.is_empty() {
        println!("\nCategories");
        print!("{}", format_category_options(&counts));
        println!("\nTop categories");
        print!("{}", format_sidebar(&counts, None));
    }

    Ok(stats)
}
