//! HTTP surface of the vault proxy.
//!
//! | Method  | Path                  | Response                         |
//! |---------|-----------------------|----------------------------------|
//! | GET     | `/api/poolSummary`    | [`PoolSummary`]                  |
//! | GET     | `/api/vaults`         | array of [`Vault`]               |
//! | GET     | `/api/vault/:address` | [`VaultDetail`]                  |
//! | OPTIONS | any                   | CORS preflight, empty body       |
//!
//! Anything else is a plain-text 404. Handler failures become a 500 with an
//! `{"error": message}` body.

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::aggregator::VaultAggregator;
use crate::error::{Result, VaultError};
use crate::models::{ErrorResponse, PoolSummary, Vault, VaultDetail};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: VaultAggregator,
}

/// Permissive CORS policy shared by the proxy and the dashboard.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/poolSummary", get(pool_summary))
        .route("/api/vaults", get(list_vaults))
        .route("/api/vault/:safe_address", get(get_vault))
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

async fn pool_summary(State(state): State<AppState>) -> Result<Json<PoolSummary>> {
    let summary = state.aggregator.pool_summary().await?;
    debug!(
        "Pool summary: {} vault(s), {} POL, {} USD",
        summary.total_vaults.unwrap_or_default(),
        summary.total_pol,
        summary.total_usd
    );
    Ok(Json(summary))
}

async fn list_vaults(State(state): State<AppState>) -> Result<Json<Vec<Vault>>> {
    let vaults = state.aggregator.vaults().await?;
    Ok(Json(vaults))
}

async fn get_vault(
    State(state): State<AppState>,
    Path(safe_address): Path<String>,
) -> Result<Json<VaultDetail>> {
    let vault = state.aggregator.vault(&safe_address).await?;
    Ok(Json(vault))
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
