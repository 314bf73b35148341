use anyhow::Context;
use graduation_vaults::api::shutdown_signal;
use graduation_vaults::dashboard::{create_dashboard_router, DashboardAppState, DashboardLoader, Snapshot};
use graduation_vaults::DashboardConfig;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Graduation Vaults dashboard");

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    let loader = DashboardLoader::from_config(&config).context("Failed to build data loader")?;

    // A failed first load still serves the page, just with nothing in it.
    let snapshot = match loader.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Initial load failed: {}", e);
            Snapshot::default()
        }
    };

    let app = create_dashboard_router(DashboardAppState::new(loader, snapshot));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server error")?;

    Ok(())
}
