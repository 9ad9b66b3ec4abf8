//! Standalone table editor server
//!
//! Opens a SQLite database file and serves the table editor for it.
//!
//! # Usage
//!
//! ```bash
//! # Browse ./chinook.db at http://127.0.0.1:5000/
//! editor-server
//!
//! # Another file, mounted under /editor, 50 rows per page
//! editor-server --database data/app.db --base-path /editor --per-page 50
//!
//! # Throwaway database with sample artists and albums
//! editor-server --database demo.db --demo
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::get, Router};
use axum_table_editor::TableEditorLayer;
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod database;

/// Browse and edit a SQLite database in the browser
#[derive(Parser, Debug)]
#[command(name = "editor-server", version, about)]
struct Args {
    /// SQLite database file to open
    #[arg(
        short = 'd',
        long,
        value_name = "FILE",
        default_value = "chinook.db",
        env = "TABLE_EDITOR_DATABASE"
    )]
    database: PathBuf,

    /// Address to listen on
    #[arg(
        short = 'b',
        long,
        default_value = "127.0.0.1:5000",
        env = "TABLE_EDITOR_BIND"
    )]
    bind: SocketAddr,

    /// URL path to mount the editor under (e.g. /editor)
    #[arg(long, value_name = "PATH", env = "TABLE_EDITOR_BASE_PATH")]
    base_path: Option<String>,

    /// Rows shown per table page
    #[arg(long, default_value_t = 100, env = "TABLE_EDITOR_PER_PAGE")]
    per_page: u64,

    /// Create the database file if it does not exist
    #[arg(long)]
    create: bool,

    /// Seed demo artists and albums tables (implies --create)
    #[arg(long)]
    demo: bool,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", env = "TABLE_EDITOR_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    if args.database.exists() {
        info!(path = %args.database.display(), "Database file exists");
    } else {
        warn!(path = %args.database.display(), "Database file does not exist");
    }

    // The pool lives for the whole process and is handed to the editor explicitly
    let options = SqliteConnectOptions::new()
        .filename(&args.database)
        .create_if_missing(args.create || args.demo);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", args.database.display()))?;

    if args.demo {
        database::seed_demo(&pool)
            .await
            .context("Failed to seed demo data")?;
    }

    let base_path = args.base_path.unwrap_or_default();
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(pool.clone())
        .merge(
            TableEditorLayer::sqlite(base_path.clone(), pool.clone())
                .per_page(args.per_page)
                .into_router(),
        );

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    info!(
        "Table editor available at http://{}{}/",
        args.bind,
        base_path.trim_end_matches('/')
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Database pool closed");

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(format!(
            "editor_server={level},axum_table_editor={level},warn"
        ))
        .unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", error);
    }
    info!("Shutdown signal received");
}

async fn health_handler(State(pool): State<SqlitePool>) -> Result<&'static str, StatusCode> {
    // Verify database connectivity
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok("ok")
}
