//! Read-only dashboard: student search, vault grid and detail panel.
//!
//! Loaded data lives in a [`Snapshot`]; per-view UI state is an explicit
//! [`DashboardState`] passed to the search and render functions.

pub mod loader;
pub mod render;
pub mod search;
pub mod server;
pub mod state;

pub use loader::{load_students, mock_vaults, DashboardLoader, MockPoolData, PoolDataSource, ProxyPoolData};
pub use server::{create_dashboard_router, DashboardAppState};
pub use state::{DashboardState, Snapshot, UiEvent};
