use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use mock_api_server::config::{Config, APP_NAME, APP_VERSION};
use mock_api_server::store::{BackingFile, EndpointStore};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "Local mock API server")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Endpoint data file (overrides MOCK_API_DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting {APP_NAME} v{APP_VERSION}");
    tracing::info!("Data file: {}", config.data_file.display());

    let store = EndpointStore::open(BackingFile::new(config.data_file.clone())).await;

    let addr = SocketAddr::new(config.host, config.port);
    let app = mock_api_server::build_app(store, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
