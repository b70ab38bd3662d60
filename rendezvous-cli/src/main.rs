use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rendezvous::server::{ConnectionRegistry, ServerConfig, SignalingService, serve};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rendezvous")]
#[command(about = "Room-based signaling relay for peer-to-peer sessions")]
#[command(after_help = "Unset flags fall back to the PORT, BIND_ADDRESS and STATIC_DIR environment variables, then to the built-in defaults.")]
struct Cli {
    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind.
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Directory served at `/`.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `rendezvous_server=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// `base` with every flag that was given applied on top.
    fn config(&self, base: ServerConfig) -> ServerConfig {
        ServerConfig {
            bind: self.bind.unwrap_or(base.bind),
            port: self.port.unwrap_or(base.port),
            static_dir: self.static_dir.clone().unwrap_or(base.static_dir),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log filter `{}`", cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.config(ServerConfig::from_env());

    println!("{}", "Rendezvous signaling relay".green().bold());
    println!("{} http://localhost:{}", "Local:".cyan(), config.port);
    println!("{} ws://localhost:{}/ws", "Relay:".cyan(), config.port);
    println!("{} {}", "Assets:".cyan(), config.static_dir.display());

    let service = SignalingService::new(ConnectionRegistry::new());

    serve(&config, service, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
