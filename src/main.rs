use anyhow::Context;
use graduation_vaults::{api, Config, VaultAggregator};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Graduation Vaults proxy");

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.safe_list.is_empty() {
        info!("SAFE_LIST not set, serving fallback mock vault");
    }

    let aggregator = VaultAggregator::from_config(&config);
    let app = api::create_router(api::AppState { aggregator });

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(api::shutdown_signal())
        .await
        .context("API server error")?;

    info!("Proxy stopped");
    Ok(())
}
