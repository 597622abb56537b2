//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use macrolens_core::ExportFormat;

/// Macrolens - Cache and analyze BCB SGS time series
#[derive(Parser)]
#[command(name = "macrolens")]
#[command(about = "Local cache and insights for Banco Central do Brasil time series", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides settings and MACROLENS_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Settings file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Fetch a series from SGS and store it locally
    Sync {
        /// SGS series code (e.g., 432 for SELIC)
        code: i64,

        /// First date to fetch (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date to fetch (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// List cached series
    Series,

    /// Show cached observations of a series, one page at a time
    Show {
        /// SGS series code
        code: i64,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: i64,

        /// Observations per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<i64>,

        /// Start date filter (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date filter (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Compute insights over a cached series
    Insights {
        /// SGS series code
        code: i64,

        /// Start date filter (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date filter (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of trailing observations to show
        #[arg(long, default_value = "10")]
        recent: usize,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// List suggested SGS series codes
    Catalog,

    /// Export cached observations
    Export {
        /// SGS series code
        code: i64,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start date filter (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date filter (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show database and settings status
    Status,
}
