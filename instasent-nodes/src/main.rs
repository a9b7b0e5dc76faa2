use anyhow::{Context, Result};
use instasent::config::{load_config, InstasentConfig};
use instasent::Executor;
use instasent_nodes::api::{create_router, ApiState};
use instasent_nodes::registry::{build_nodes, CredentialSet};
use instasent_nodes::FailurePolicy;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instasent_nodes=info,instasent=info".into()),
        )
        .init();

    info!("Instasent nodes starting...");

    // Optional TOML config; defaults otherwise
    let config = match std::env::var("INSTASENT_CONFIG") {
        Ok(path) => {
            let config = load_config(&path)?;
            info!(path = %path, "Configuration loaded");
            config
        }
        Err(_) => {
            info!("INSTASENT_CONFIG not set, using defaults");
            InstasentConfig::default()
        }
    };

    info!(
        base_url = %config.api.base_url,
        timeout_secs = ?config.api.timeout_secs,
        continue_on_fail = config.batch.continue_on_fail,
        port = config.server.port,
        "Configuration resolved"
    );

    let executor = Executor::from_config(&config.api)?;
    let credentials = CredentialSet::from_env();
    let nodes = build_nodes(&executor, &credentials);
    if nodes.is_empty() {
        warn!("No node has credentials; only descriptions will be served");
    }

    // Start HTTP API server
    let api_state = ApiState {
        nodes,
        default_policy: FailurePolicy::from_continue_on_fail(config.batch.continue_on_fail),
    };
    let router = create_router(api_state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port))
        .await
        .context("Failed to bind host API port")?;
    info!(port = config.server.port, "Host API listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Host API server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    info!("Instasent nodes stopped");

    Ok(())
}
