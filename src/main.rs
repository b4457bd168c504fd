use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use toothcall_gateway::{AppState, Prompts, ServerConfig, ToolRegistry, create_app};

/// Tooth call gateway - telephony media streams bridged to the OpenAI Realtime API
#[derive(Parser, Debug)]
#[command(name = "toothcall-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Must happen before the first TLS connection
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let cli = Cli::parse();

    let config = if let Some(config_path) = cli.config {
        info!("Loading configuration from {}", config_path.display());
        ServerConfig::from_file(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    let prompts = Prompts::load(&config.prompts_dir)?;
    let tools = ToolRegistry::from_config(&config, &prompts)?;

    let address = config.address();
    let app = create_app(AppState::new(config, &prompts, tools));

    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on {}", address);

    axum::serve(listener, app).await?;
    Ok(())
}
