use anyhow::Result;
use log::debug;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use daily_arxiv_digest::common::{parse_date, setup_logging};
use daily_arxiv_digest::feed::FeedLoader;
use daily_arxiv_digest::index::SortMode;
use daily_arxiv_digest::preferences::Preferences;
use daily_arxiv_digest::render::{format_category_options, format_dates, format_detail, format_page, format_sidebar};
use daily_arxiv_digest::session::{Action, Direction, Driver, Session};
use daily_arxiv_digest::view::category_choice;

use super::open_loader;
use crate::cli::BrowseArgs;

const HELP: &str = "\
commands:
  date YYYY-MM-DD     load a day's digest
  dates               list available dates
  cats                category counts
  cat CODE|all        filter by category
  side CODE           toggle a category (sidebar)
  kw WORD             toggle a keyword tag
  author NAME         toggle an author tag
  search [TEXT]       rank papers containing TEXT first (empty clears)
  sort date|title     re-sort the digest
  page N              go to page N
  open N              show paper N of the listing
  next | prev         move through papers (wraps)
  random              open a random paper
  close               back to the listing
  help | quit";

/// A parsed input line
#[derive(Debug)]
pub enum BrowseCommand {
    Action(Action),
    Dates,
    Categories,
    Help,
    Quit,
}

fn required<'a>(arg: &'a str, what: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("missing {}", what))
    } else {
        Ok(arg)
    }
}

fn number(arg: &str, what: &str) -> Result<usize, String> {
    required(arg, what)?
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", what, arg))
}

/// Map one line of input to a command
pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    let action = match verb.to_lowercase().as_str() {
        "" => return Err("empty command, try 'help'".to_string()),
        "help" | "?" => return Ok(BrowseCommand::Help),
        "quit" | "q" | "exit" => return Ok(BrowseCommand::Quit),
        "dates" => return Ok(BrowseCommand::Dates),
        "cats" | "categories" => return Ok(BrowseCommand::Categories),
        "date" => {
            let date = required(arg, "date")?;
            Action::SelectDate(parse_date(date).ok_or_else(|| format!("invalid date '{}'", date))?)
        }
        "cat" | "category" => Action::SelectCategory(category_choice(arg)),
        "side" => Action::ToggleCategory(required(arg, "category")?.to_string()),
        "kw" | "keyword" => Action::ToggleKeyword(required(arg, "keyword")?.to_string()),
        "author" => Action::ToggleAuthor(required(arg, "author")?.to_string()),
        "search" | "/" => Action::SetSearchText(arg.to_string()),
        "sort" => Action::SetSortMode(required(arg, "sort mode")?.parse::<SortMode>()?),
        "page" => Action::SetPage(number(arg, "page")?),
        "open" => {
            let n = number(arg, "paper number")?;
            if n == 0 {
                return Err("papers are numbered from 1".to_string());
            }
            Action::SelectPaper(n - 1)
        }
        "next" | "n" => Action::NavigatePaper(Direction::Next),
        "prev" | "p" => Action::NavigatePaper(Direction::Previous),
        "random" | "r" => Action::RandomPaper,
        "close" | "esc" => Action::ClosePaper,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(BrowseCommand::Action(action))
}

fn render(session: &Session) -> String {
    match session.selected() {
        Some((index, paper)) => format_detail(paper, index, session.filtered().len()),
        None => format_page(session),
    }
}

async fn run_browse_async(args: BrowseArgs, loader: FeedLoader, preferences: Preferences) -> Result<()> {
    let manifest = loader.discover_dates().await;
    let latest = manifest.latest();
    let session = Session::new(manifest, &preferences, args.source.language);

    let (updates, watcher) = watch::channel(session.clone());
    let snapshot = watcher.clone();
    let (tx, rx) = mpsc::channel(64);

    let driver = Driver::new(loader, session).with_search_delay(Duration::from_millis(args.search_delay_ms));
    let driver_task = tokio::spawn(driver.run(rx, updates));

    let render_task = tokio::spawn(async move {
        let mut watcher = watcher;
        while watcher.changed().await.is_ok() {
            let session = watcher.borrow_and_update().clone();
            println!("{}", render(&session));
        }
    });

    println!("{}\n", HELP);
    if let Some(date) = latest {
        tx.send(Action::SelectDate(date)).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(BrowseCommand::Action(action)) => {
                debug!("Dispatching {:?}", action);
                tx.send(action).await?;
            }
            Ok(BrowseCommand::Dates) => print!("{}", format_dates(snapshot.borrow().manifest())),
            Ok(BrowseCommand::Categories) => {
                let session = snapshot.borrow().clone();
                let counts = session.counts();
                print!("{}", format_category_options(&counts));
                println!();
                print!("{}", format_sidebar(&counts, session.filter().selected_category.as_deref()));
            }
            Ok(BrowseCommand::Help) => println!("{}", HELP),
            Ok(BrowseCommand::Quit) => break,
            Err(message) => eprintln!("{}", message),
        }
    }

    drop(tx);
    driver_task.await?;
    render_task.await?;
    Ok(())
}

pub fn run_browse(args: BrowseArgs) -> Result<()> {
    setup_logging(&args.source.log_level)?;

    let loader = open_loader(&args.source)?;
    let preferences = Preferences::load(&args.source.prefs);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_browse_async(args, loader, preferences))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(line: &str) -> Action {
        match parse_command(line) {
            Ok(BrowseCommand::Action(action)) => action,
            other => panic!("expected action for '{}', got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_actions() {
        assert!(matches!(action("date 2025-01-10"), Action::SelectDate(_)));
        assert!(matches!(action("cat all"), Action::SelectCategory(None)));
        assert!(matches!(action("cat cs.AI"), Action::SelectCategory(Some(c)) if c == "cs.AI"));
        assert!(matches!(action("side cs.AI"), Action::ToggleCategory(c) if c == "cs.AI"));
        assert!(matches!(action("kw large language"), Action::ToggleKeyword(k) if k == "large language"));
        assert!(matches!(action("author  Ada Lovelace "), Action::ToggleAuthor(a) if a == "Ada Lovelace"));
        assert!(matches!(action("search"), Action::SetSearchText(s) if s.is_empty()));
        assert!(matches!(action("sort title"), Action::SetSortMode(SortMode::Title)));
        assert!(matches!(action("page 3"), Action::SetPage(3)));
        assert!(matches!(action("open 1"), Action::SelectPaper(0)));
        assert!(matches!(action("next"), Action::NavigatePaper(Direction::Next)));
        assert!(matches!(action("p"), Action::NavigatePaper(Direction::Previous)));
        assert!(matches!(action("random"), Action::RandomPaper));
        assert!(matches!(action("ESC"), Action::ClosePaper));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("date").is_err());
        assert!(parse_command("date 2025-02-30").is_err());
        assert!(parse_command("page two").is_err());
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("sort stars").is_err());
        assert!(parse_command("fly").is_err());
    }

    #[test]
    fn test_parse_meta_commands() {
        assert!(matches!(parse_command("quit"), Ok(BrowseCommand::Quit)));
        assert!(matches!(parse_command("help"), Ok(BrowseCommand::Help)));
        assert!(matches!(parse_command("dates"), Ok(BrowseCommand::Dates)));
        assert!(matches!(parse_command("cats"), Ok(BrowseCommand::Categories)));
    }
}
