//! taskdeck-server: HTTP boundary for the task-tracking core.
//!
//! # Responsibility
//! - Parse process configuration and bootstrap logging + storage.
//! - Serve the REST API over the core services.

mod rest;

use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use rest::{build_router, AppState};

/// Command-line configuration for the task service.
#[derive(Debug, Parser)]
#[command(
    name = "taskdeck-server",
    about = "Task-tracking backend for chat-bot integrations"
)]
struct Args {
    /// SQLite database file. Uses an in-memory database when omitted.
    #[arg(long, env = "TASKDECK_DB")]
    db_path: Option<PathBuf>,

    /// Socket address to bind.
    #[arg(long, env = "TASKDECK_BIND", default_value = "127.0.0.1:8320")]
    bind: SocketAddr,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "TASKDECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files. File logging is off when omitted.
    #[arg(long, env = "TASKDECK_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_ref() {
        let level = args
            .log_level
            .clone()
            .unwrap_or_else(|| taskdeck_core::default_log_level().to_string());
        taskdeck_core::init_logging(&level, &log_dir.to_string_lossy())?;
    }

    let conn = match args.db_path.as_ref() {
        Some(path) => taskdeck_core::db::open_db(path)?,
        None => taskdeck_core::db::open_db_in_memory()?,
    };

    let state = Arc::new(AppState::new(conn));
    let router = build_router(state);

    info!(
        "event=server_start module=server status=ok bind={} version={}",
        args.bind,
        taskdeck_core::core_version()
    );

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
