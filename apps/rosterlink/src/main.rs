//! # Rosterlink CLI
//!
//! Links player names from a betting feed to the records of a fantasy roster
//! and exports the linked records to an idempotent JSON store.
//!
//! ## Usage
//!
//! ```bash
//! rosterlink [--config <file>] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rosterlink extract` | Write query and pool name lists from a feed and a roster |
//! | `rosterlink resolve` | Run the resolution stages and export the links |
//! | `rosterlink score <a> <b>` | Show the similarity breakdown of two names |
//! | `rosterlink config` | Print the effective configuration as TOML |
//!
//! ## Examples
//!
//! ```bash
//! # Pull the names out of the raw inputs
//! rosterlink extract --feed epl_data.json --records players.json --out-dir lists
//!
//! # See what a run would export without touching the store
//! rosterlink resolve --queries lists/query_names.txt --records players.json --dry-run
//!
//! # Start a fresh store, keep the leftovers for review
//! rosterlink resolve --queries lists/query_names.txt --records players.json \
//!     --reset --residuals lists
//! ```

mod commands;
mod report;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExtractArgs, ResolveArgs};
use settings::Overrides;

/// Player identity resolution across data sources
#[derive(Parser)]
#[command(name = "rosterlink", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Defaults to `rosterlink/config.toml` under the user config directory
    /// when that file exists, built-in defaults otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract query and pool name lists.
    ///
    /// Writes `query_names.txt` (runner names of the market), and
    /// `pool_display_names.txt` / `pool_raw_names.txt` from the roster.
    Extract {
        /// Betting feed JSON
        #[arg(long)]
        feed: PathBuf,

        /// Roster JSON (array of player records)
        #[arg(long)]
        records: PathBuf,

        /// Directory for the name lists
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Market whose runners are extracted
        #[arg(long, default_value = rosterlink_io::SHOTS_MARKET)]
        market: String,
    },

    /// Resolve query names and export the linked records.
    Resolve {
        /// Query names, one per line
        #[arg(long)]
        queries: PathBuf,

        /// Roster JSON (array of player records)
        #[arg(long)]
        records: PathBuf,

        /// Pool names, one per line; derived from the roster when omitted
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Export store (overrides `export.store_path`)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Fuzzy acceptance threshold, 0-100 (overrides `matching.threshold`)
        #[arg(long)]
        threshold: Option<f64>,

        /// Report what would be exported without writing the store
        #[arg(long)]
        dry_run: bool,

        /// Delete the store before exporting
        #[arg(long)]
        reset: bool,

        /// Directory for `unresolved_queries.txt` and `remaining_pool.txt`
        #[arg(long)]
        residuals: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the similarity breakdown of two names.
    Score { a: String, b: String },

    /// Print the effective configuration as TOML.
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        defaults: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Extract {
            feed,
            records,
            out_dir,
            market,
        } => commands::extract(
            config,
            &ExtractArgs {
                feed,
                records,
                out_dir,
                market,
            },
        ),
        Commands::Resolve {
            queries,
            records,
            pool,
            store,
            threshold,
            dry_run,
            reset,
            residuals,
            json,
        } => commands::resolve(
            config,
            &ResolveArgs {
                queries,
                records,
                pool,
                reset,
                residuals,
                json,
                overrides: Overrides {
                    threshold,
                    store,
                    dry_run,
                },
            },
        ),
        Commands::Score { a, b } => commands::score(config, &a, &b),
        Commands::Config { defaults } => commands::show_config(config, defaults),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_flags() {
        let cli = Cli::try_parse_from([
            "rosterlink",
            "-v",
            "resolve",
            "--queries",
            "q.txt",
            "--records",
            "players.json",
            "--threshold",
            "85",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Resolve {
                threshold, dry_run, ..
            } => {
                assert_eq!(threshold, Some(85.0));
                assert!(dry_run);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from([
            "rosterlink",
            "extract",
            "--feed",
            "epl_data.json",
            "--records",
            "players.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                out_dir, market, ..
            } => {
                assert_eq!(out_dir, PathBuf::from("."));
                assert_eq!(market, rosterlink_io::SHOTS_MARKET);
            }
            _ => panic!("expected extract"),
        }
    }
}
