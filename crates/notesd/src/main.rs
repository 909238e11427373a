//! Notes Daemon - proxy between the notes page and the formatting workflow.

use anyhow::Result;
use clap::Parser;
use notesd::config::Config;
use notesd::server;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notesd")]
#[command(about = "Notes formatter daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Config file (default: /etc/notes-formatter/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen port, overrides config and $PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("notesd v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(port) = args.port {
        config.server.port = port;
    }

    server::run(config).await
}
