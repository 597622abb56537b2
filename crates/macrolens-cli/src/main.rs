//! Macrolens CLI - BCB SGS series cache and insights
//!
//! Usage:
//!   macrolens init                 Initialize database
//!   macrolens sync 432             Fetch a series from SGS
//!   macrolens insights 432         Show insights over cached data
//!   macrolens serve --port 8000    Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use macrolens_core::{DateRange, SgsClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = commands::load_settings(cli.config.as_deref())?;
    let db_path = commands::resolve_db_path(cli.db.as_deref(), &settings);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&db_path, settings, &host, port, static_dir.as_deref()).await,
        Commands::Sync { code, from, to } => {
            let db = commands::open_db(&db_path)?;
            let source = SgsClient::from_settings(&settings.source)?;
            commands::cmd_sync(&db, &source, code, DateRange::new(from, to))
                .await
                .map(|_| ())
        }
        Commands::Series => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_series_list(&db)
        }
        Commands::Show {
            code,
            page,
            page_size,
            from,
            to,
        } => {
            let db = commands::open_db(&db_path)?;
            let page_size = page_size.unwrap_or(settings.page_size);
            commands::cmd_show(&db, code, DateRange::new(from, to), page, page_size).map(|_| ())
        }
        Commands::Insights {
            code,
            from,
            to,
            recent,
            json,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_insights(&db, code, DateRange::new(from, to), recent, json).map(|_| ())
        }
        Commands::Catalog => commands::cmd_catalog(),
        Commands::Export {
            code,
            format,
            output,
            from,
            to,
        } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_export(
                &db,
                code,
                DateRange::new(from, to),
                format,
                output.as_deref(),
            )
        }
        Commands::Status => commands::cmd_status(&db_path, &settings),
    }
}
