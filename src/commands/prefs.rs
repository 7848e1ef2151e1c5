use anyhow::Result;

use daily_arxiv_digest::preferences::Preferences;

use crate::cli::{PrefsAction, PrefsArgs};

pub fn run_prefs(args: PrefsArgs) -> Result<Preferences> {
    let mut prefs = Preferences::load(&args.prefs);

    let changed = match &args.action {
        PrefsAction::List => false,
        PrefsAction::AddKeyword { keyword } => prefs.add_keyword(keyword),
        PrefsAction::RemoveKeyword { keyword } => prefs.remove_keyword(keyword),
        PrefsAction::AddAuthor { author } => prefs.add_author(author),
        PrefsAction::RemoveAuthor { author } => prefs.remove_author(author),
    };

    if changed {
        prefs.save(&args.prefs)?;
    }

    println!("Keywords: {}", prefs.keywords.join(", "));
    println!("Authors: {}", prefs.authors.join(", "));

    Ok(prefs)
}
