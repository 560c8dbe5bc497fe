//! CLI argument definitions for indexwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `watch` | Poll continuously and re-render on every snapshot |
//! | `once` | Run a single refresh cycle and print it |
//! | `instruments` | Print the configured watch list |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--config` | none | TOML configuration file |
//! | `--interval-ms` | from config | Refresh interval override |
//! | `--timeout-ms` | from config | Per-request timeout override |
//! | `--log-json` | `false` | Emit logs as JSON on stderr |
//!
//! # Examples
//!
//! ```bash
//! # Watch the default list; press Enter to refresh immediately
//! indexwatch watch
//!
//! # One cycle as JSON with a custom list
//! indexwatch once --format json --config watchlist.toml
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Polling monitor for index and futures quotes.
#[derive(Debug, Parser)]
#[command(
    name = "indexwatch",
    author,
    version,
    about = "Polling monitor for index and futures quotes",
    long_about = "indexwatch polls a fixed list of market indices and futures, normalizes \
every response into a quote row and prints one consistent snapshot per refresh cycle.\n\
\n\
Use 'indexwatch <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for snapshots.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// TOML configuration file.
    #[arg(long, global = true, env = "INDEXWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Refresh interval in milliseconds (overrides the config file).
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds (overrides the config file).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Emit logs as JSON instead of human-readable lines.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminals.
    Table,
    /// One JSON document per snapshot.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll continuously and re-render on every snapshot.
    ///
    /// Any line typed on stdin triggers an immediate refresh. Ctrl-C stops.
    Watch(WatchArgs),

    /// Run a single refresh cycle and print the snapshot.
    Once,

    /// Print the configured watch list.
    Instruments,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Ignore stdin instead of treating each line as a refresh request.
    #[arg(long, default_value_t = false)]
    pub no_stdin: bool,
}
