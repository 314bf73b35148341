use axum::{
    extract::{Path, Query, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::loader::DashboardLoader;
use super::render::{render_page, render_typeahead_items, render_vault_panel};
use super::state::{DashboardState, Snapshot, UiEvent};
use crate::api::cors_layer;
use crate::error::Result;
use crate::models::Student;

#[derive(Clone)]
pub struct DashboardAppState {
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    loader: DashboardLoader,
}

impl DashboardAppState {
    pub fn new(loader: DashboardLoader, snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            loader,
        }
    }

    pub async fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Replaces the snapshot with a fresh load. On failure the previous
    /// snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<Snapshot>> {
        let fresh = match self.loader.load().await {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                warn!("Reload failed, keeping previous data: {}", e);
                return Err(e);
            }
        };
        *self.snapshot.write().await = fresh.clone();
        Ok(fresh)
    }
}

/// Page query parameters, each mapping onto one [`UiEvent`].
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub q: Option<String>,
    pub submit: Option<String>,
    pub select: Option<String>,
    pub vault: Option<String>,
    pub close: Option<String>,
}

impl PageQuery {
    pub fn events(self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if let Some(q) = self.q {
            events.push(UiEvent::Input(q));
            if self.submit.is_some() {
                events.push(UiEvent::Submit);
            }
        }
        if let Some(student_id) = self.select {
            events.push(UiEvent::SelectSuggestion(student_id));
        }
        if let Some(student_id) = self.vault {
            events.push(UiEvent::OpenVault(student_id));
        }
        if self.close.is_some() {
            events.push(UiEvent::ClosePanel);
        }
        events
    }
}

#[derive(Debug, Deserialize)]
pub struct TypeaheadQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub students: usize,
    pub vaults: usize,
    pub source: String,
}

pub fn create_dashboard_router(state: DashboardAppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/vault/:student_id", get(vault_page))
        .route("/panel/:student_id", get(panel))
        .route("/typeahead", get(typeahead))
        .route("/data/students.json", get(students))
        .route("/reload", post(reload))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn render_with(snapshot: Arc<Snapshot>, events: Vec<UiEvent>) -> Html<String> {
    let mut ui = DashboardState::new(snapshot);
    for event in events {
        ui.handle(event);
    }
    Html(render_page(&ui))
}

async fn page(
    State(state): State<DashboardAppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    render_with(state.current().await, query.events())
}

async fn vault_page(
    State(state): State<DashboardAppState>,
    Path(student_id): Path<String>,
) -> Html<String> {
    render_with(state.current().await, vec![UiEvent::OpenVault(student_id)])
}

/// Panel body for in-page opening. Unknown ids yield an empty fragment.
async fn panel(
    State(state): State<DashboardAppState>,
    Path(student_id): Path<String>,
) -> Html<String> {
    let snapshot = state.current().await;
    Html(
        snapshot
            .vault(&student_id)
            .map(render_vault_panel)
            .unwrap_or_default(),
    )
}

async fn typeahead(
    State(state): State<DashboardAppState>,
    Query(query): Query<TypeaheadQuery>,
) -> Html<String> {
    let mut ui = DashboardState::new(state.current().await);
    ui.handle(UiEvent::Input(query.q));
    Html(render_typeahead_items(&ui))
}

async fn students(State(state): State<DashboardAppState>) -> Json<Vec<Student>> {
    Json(state.current().await.students.clone())
}

async fn reload(State(state): State<DashboardAppState>) -> Result<Json<ReloadResponse>> {
    let snapshot = state.reload().await?;
    info!("Dashboard data reloaded");
    Ok(Json(ReloadResponse {
        students: snapshot.students.len(),
        vaults: snapshot.vaults.len(),
        source: state.loader.source_name().to_string(),
    }))
}
