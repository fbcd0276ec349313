use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod config;
mod dashboard;
mod db;
mod report;
mod standings;

use config::Config;
use dashboard::AppState;
use db::{Database, RequestCache};
use standings::LeagueTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    if config.print {
        return print_table(&db, &config);
    }

    let dashboard_state = AppState {
        db,
        default_season: config.season,
        last_results: config.last_results,
    };
    let app = dashboard::router(dashboard_state);
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

/// Print one season's table to stdout.
fn print_table(db: &Database, config: &Config) -> Result<()> {
    let season = match config.season {
        Some(id) => db
            .get_season(id)?
            .with_context(|| format!("season {id} not found"))?,
        None => db
            .latest_season()?
            .context("the database holds no seasons")?,
    };
    info!("Printing {} (season {})", season.name, season.id);

    let matches = db.season_matches(season.id, None)?;
    let table = LeagueTable::build(&season, &matches, &[], config.date, config.last_results)?;

    let mut cache = RequestCache::new(db);
    let text = report::render_table(&table, &mut cache, config.combined)?;
    print!("{text}");
    Ok(())
}
