pub mod error;
pub mod models;
pub mod config;
pub mod source;
pub mod aggregator;
pub mod api;
pub mod dashboard;

pub use error::{VaultError, Result};
pub use models::*;
pub use config::{Config, DashboardConfig};
pub use source::{VaultSource, MockVaultSource, SafeListSource};
pub use aggregator::{VaultAggregator, summarize};
