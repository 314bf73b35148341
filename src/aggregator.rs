use crate::config::Config;
use crate::error::Result;
use crate::models::{PoolSummary, Vault, VaultDetail, SIGNER_ROLES};
use crate::source::{MockVaultSource, SafeListSource, VaultSource};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::info;

/// Produces vault records and the derived pool summary from a [`VaultSource`].
///
/// Every call recomputes from the source; nothing is cached between requests.
#[derive(Clone)]
pub struct VaultAggregator {
    source: Arc<dyn VaultSource>,
}

impl VaultAggregator {
    pub fn new(source: Arc<dyn VaultSource>) -> Self {
        Self { source }
    }

    /// Selects the mock source when no safes are configured.
    pub fn from_config(config: &Config) -> Self {
        let source: Arc<dyn VaultSource> = if config.safe_list.is_empty() {
            Arc::new(MockVaultSource)
        } else {
            Arc::new(SafeListSource::new(config))
        };
        info!("Vault aggregator using {} source", source.name());
        Self::new(source)
    }

    pub async fn vaults(&self) -> Result<Vec<Vault>> {
        self.source.list_vaults().await
    }

    pub async fn pool_summary(&self) -> Result<PoolSummary> {
        let vaults = self.source.list_vaults().await?;
        let last_sync = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(summarize(&vaults, last_sync))
    }

    pub async fn vault(&self, safe_address: &str) -> Result<VaultDetail> {
        self.source.vault_by_address(safe_address).await
    }
}

/// Sums balances across `vaults`. The signer labels are always the fixed set.
pub fn summarize(vaults: &[Vault], last_sync: String) -> PoolSummary {
    PoolSummary {
        total_vaults: Some(vaults.len()),
        total_pol: vaults.iter().map(|v| v.pol_balance).sum(),
        total_usd: vaults.iter().map(|v| v.usd_balance).sum(),
        signers_global: SIGNER_ROLES.iter().map(|s| s.to_string()).collect(),
        last_sync: Some(last_sync),
    }
}
