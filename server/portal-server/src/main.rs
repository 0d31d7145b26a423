use clap::Parser;
use colored::*;
use std::net::SocketAddr;
use tracing::info;

use portal_server::{create_app, PortalServer, ServerConfig};

/// HealthDesk Portal Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "portal-server")]
#[command(about = "Telehealth portal HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger_phi::init_tracing(args.verbose)?;

    info!("🏥 {}", "Starting HealthDesk Portal Engine".bright_cyan());
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION").bright_white());

    let config = ServerConfig::from_env()?;
    info!(
        "🔗 Upstream data service: {}",
        config.base_url.bright_yellow()
    );

    let server = PortalServer::new(config)?;
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "🚀 {}",
        format!("Portal server running on http://{addr}").bright_green()
    );
    info!(
        "📋 {}",
        format!("Health check available at: http://{addr}/health").bright_blue()
    );
    info!(
        "🔐 {}",
        format!("Auth endpoints: http://{addr}/api/auth").bright_blue()
    );

    axum::serve(listener, app).await?;
    Ok(())
}
