mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{run_browse, run_dates, run_prefs, run_show, run_stats};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dates(args) => {
            run_dates(args)?;
        }
        Commands::Show(args) => {
            run_show(args)?;
        }
        Commands::Stats(args) => {
            run_stats(args)?;
        }
        Commands::Browse(args) => {
            run_browse(args)?;
        }
        Commands::Prefs(args) => {
            run_prefs(args)?;
        }
    }

    Ok(())
}
