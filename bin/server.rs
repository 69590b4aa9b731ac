// Roster Attendance - Web Server
// REST API with Axum over the local roster database

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use roster_attendance::api::{self, AppState};
use roster_attendance::config::DEFAULT_SERVER_ADDR;
use roster_attendance::{Config, Roster, SqliteStore};

/// HTTP API for the attendance roster.
#[derive(Parser, Debug)]
#[command(name = "roster-server", version, about, long_about = None)]
struct Args {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the roster database.
    #[arg(long, env = "ROSTER_DB")]
    db: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "ROSTER_ADDR", default_value = DEFAULT_SERVER_ADDR)]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Servers want to see requests by default
    roster_attendance::logging::init_stderr(args.verbose.max(1));

    let config = Config::resolve(args.db)?;
    let store = SqliteStore::open(config.db_path())
        .with_context(|| format!("Failed to open roster database {}", config.db_path().display()))?;
    let roster = Roster::load(store)?;
    tracing::info!(db = %config.db_path().display(), "database opened");

    let app = api::app(AppState::new(roster))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;

    tracing::info!(addr = %args.addr, "server listening (Ctrl+C to stop)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}
