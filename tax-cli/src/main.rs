use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};

use tax_cli::cli::{Cli, Command};
use tax_cli::commands;
use tax_cli::config::AppConfig;
use tax_cli::logging::init_logging;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .apply(cli.overrides())
        .context("Invalid command line options")?;
    init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Compute { input } => {
            let form = commands::read_form(&input)?;
            if let Some(note) = commands::tax_year_mismatch(&form, &config) {
                warn!("{note}");
            }
            print_json(&commands::compute(&form)?)
        }
        Command::Days { input, as_of, .. } => {
            let form = commands::read_form(&input)?;
            let history = commands::days(&form, config.tax_year, commands::today_or(as_of));
            print_json(&history)
        }
        Command::Fields {
            input,
            document,
            employer,
            as_of,
        } => {
            let form = commands::read_form(&input)?;
            let values = commands::fields(form, document, employer, commands::today_or(as_of))?;
            print_json(&values)
        }
        Command::Prepare {
            input,
            products,
            as_of,
            ..
        } => {
            let form = commands::read_form(&input)?;
            let prepared =
                commands::prepare(form, &products, &config, commands::today_or(as_of)).await?;
            print_json(&prepared)
        }
    }
}
