// Binary entry point for the jade page server

mod args;
mod config;
mod constants;
mod output;
mod prompt;
mod routes;
mod templates;

use anyhow::{Context, Result, anyhow};
use args::Cli;
use clap::Parser;
use config::ServerConfig;
use jade_core::{AsyncGptClient, AsyncHttpConnector, ClientConfig};
use std::sync::Arc;
use std::time::Duration;
use templates::PageTemplates;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

/// Parse CLI arguments, load configuration and serve until interrupted.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    output::init_logging(cli.output_level());

    let config = ServerConfig::resolve(&cli)?;
    let pages = PageTemplates::new(&config.templates_dir);
    pages.validate().await?;

    let client = build_client(&cli, &config)?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %listener.local_addr()?, "Listening");

    serve(
        listener,
        client,
        pages,
        config.search_timeout(),
        shutdown_signal(),
    )
    .await?;
    info!("Server stopped");
    Ok(())
}

/// Connect `client`, serve until `shutdown` resolves, then close the client
/// and hand it back. The client is closed even when serving fails.
async fn serve(
    listener: TcpListener,
    mut client: AsyncGptClient,
    pages: PageTemplates,
    search_timeout: Duration,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<AsyncGptClient> {
    client.connect().await?;
    let client = Arc::new(client);

    let state = routes::AppState {
        client: Arc::clone(&client),
        pages: Arc::new(pages),
        search_timeout,
    };

    let served = axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown)
        .await;

    let mut client = Arc::try_unwrap(client)
        .map_err(|_| anyhow!("Completion client still in use at shutdown"))?;
    client.close().await?;

    served.context("Server error")?;
    Ok(client)
}

fn build_client(cli: &Cli, config: &ServerConfig) -> Result<AsyncGptClient> {
    let mut client_config = ClientConfig::resolve(cli.token.as_deref())?;
    if let Some(base_url) = &config.base_url {
        client_config = client_config.with_base_url(base_url);
    }
    if let Some(model) = &config.model {
        client_config = client_config.with_model(model);
    }
    Ok(AsyncGptClient::with_config(
        client_config,
        AsyncHttpConnector,
    )?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
