use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tax_core::Product;
use tax_forms::DocumentKind;

use crate::config::ConfigOverrides;

/// Nonresident filing core for F-1 students: computes federal and Illinois
/// results and prepares the paper filing packages.
#[derive(Debug, Parser)]
#[command(name = "f1-tax", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the federal and state results, the combined position and the
    /// products the filing qualifies for, as JSON.
    Compute {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Prints days present in a year and the two years before it.
    Days {
        #[command(flatten)]
        input: InputArgs,

        /// Year to count; defaults to the configured tax year.
        #[arg(long)]
        year: Option<i32>,

        /// Date bounding visits with no exit date.
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Prints the evaluated field table of one document, as JSON.
    Fields {
        #[command(flatten)]
        input: InputArgs,

        /// 8843, 1040-nr, 1040-nr-schedule-oi, il-1040, il-schedule-nr,
        /// il-schedule-il-wit, 843 or 8316.
        #[arg(short, long)]
        document: DocumentKind,

        /// Which FICA claim to use for 843 and 8316, counting from 0.
        #[arg(long, default_value_t = 0)]
        employer: usize,

        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Fills the templates and writes one PDF per product.
    Prepare {
        #[command(flatten)]
        input: InputArgs,

        /// federal, state, fica-refund or 8843-only. Repeat for several;
        /// defaults to every product the filing qualifies for.
        #[arg(short, long = "product")]
        products: Vec<Product>,

        #[arg(long)]
        templates_dir: Option<PathBuf>,

        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seconds to wait for one template before failing it.
        #[arg(long)]
        template_timeout_secs: Option<u64>,

        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Collected filing data as JSON.
    #[arg(short, long)]
    pub input: PathBuf,

    /// W-2 entries as CSV, appended to those in the input.
    #[arg(long)]
    pub w2_csv: Option<PathBuf>,
}

impl Cli {
    /// Flags that override configuration values.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            ..ConfigOverrides::default()
        };
        match &self.command {
            Command::Days { year, .. } => overrides.tax_year = *year,
            Command::Prepare {
                templates_dir,
                output_dir,
                template_timeout_secs,
                ..
            } => {
                overrides.templates_dir = templates_dir.clone();
                overrides.output_dir = output_dir.clone();
                overrides.template_timeout_secs = *template_timeout_secs;
            }
            Command::Compute { .. } | Command::Fields { .. } => {}
        }
        overrides
    }
}
