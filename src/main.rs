use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use harmony::config::Config;
use harmony::console;
use harmony::routes;
use harmony::services::relay_client::RelayClient;
use harmony::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Couples counseling chat relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the relay endpoint that forwards conversations to the completion provider.
    Serve {
        #[arg(long, env = "HARMONY_BIND", help = "Address to listen on.")]
        bind: Option<String>,
    },
    /// Start an interactive counseling session in the terminal.
    Session {
        #[arg(long, default_value = "http://localhost:3000", help = "Base URL of a running relay.")]
        relay: String,
        #[arg(long, default_value = ".", help = "Directory for downloaded transcripts.")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match cli.command {
        Commands::Serve { bind } => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            serve(config, bind).await
        }
        Commands::Session { relay, out } => {
            // stdout belongs to the conversation.
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            console::run(RelayClient::new(relay), out).await
        }
    }
}

async fn serve(config: Config, bind: Option<String>) -> Result<()> {
    if !config.has_credential() {
        warn!("GITHUB_TOKEN is not set; provider calls will be rejected");
    }

    let state = Arc::new(AppState::from_config(&config));
    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let addr = bind.unwrap_or(config.bind_address);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {addr}"))?;

    info!(%addr, "harmony relay listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Relay server failed")?;

    info!("harmony relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install CTRL+C signal handler");
    }
}
