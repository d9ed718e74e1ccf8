//! # sheetview-server
//!
//! HTTP front end for browsing Excel workbooks.

mod app;
mod config;
mod html;

use anyhow::{Context, Result};
use clap::Parser;
use sheetview_core::Viewer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.viewer_config();
    info!(
        default_path = ?config.default_path,
        locale = config.locale.code(),
        max_upload_mb = cli.max_upload_mb,
        "starting sheetview-server"
    );
    let app = app::create_router(Viewer::new(config), cli.body_limit());

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!(addr = %cli.bind, "sheetview-server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
