use crate::config::Config;
use crate::error::Result;
use crate::models::{Signers, Vault, VaultDetail, VaultStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub const FALLBACK_STUDENT_ID: &str = "GV-001";
pub const FALLBACK_DISPLAY_NAME: &str = "Aaliyah R.";
pub const FALLBACK_SAFE_ADDRESS: &str = "0x1111111111111111111111111111111111111111";
pub const FALLBACK_GRAD_YEAR: u32 = 2029;
pub const FALLBACK_POL_BALANCE: f64 = 120.5;
pub const FALLBACK_USD_BALANCE: f64 = 30.1;

/// Origin of vault records for the aggregator.
#[async_trait]
pub trait VaultSource: Send + Sync {
    async fn list_vaults(&self) -> Result<Vec<Vault>>;

    async fn vault_by_address(&self, safe_address: &str) -> Result<VaultDetail>;

    fn name(&self) -> &'static str;
}

/// Serves a single fixed record while no vault identifiers are configured.
#[derive(Debug, Default, Clone)]
pub struct MockVaultSource;

impl MockVaultSource {
    pub fn fallback_vault(now: DateTime<Utc>) -> Vault {
        Vault {
            student_id: FALLBACK_STUDENT_ID.to_string(),
            display_name: FALLBACK_DISPLAY_NAME.to_string(),
            safe_address: Some(FALLBACK_SAFE_ADDRESS.to_string()),
            grad_year: Some(FALLBACK_GRAD_YEAR),
            pol_balance: FALLBACK_POL_BALANCE,
            usd_balance: FALLBACK_USD_BALANCE,
            status: VaultStatus::Locked,
            signers: Signers::mock(),
            last_activity: Some(now),
        }
    }
}

#[async_trait]
impl VaultSource for MockVaultSource {
    async fn list_vaults(&self) -> Result<Vec<Vault>> {
        Ok(vec![Self::fallback_vault(Utc::now())])
    }

    async fn vault_by_address(&self, safe_address: &str) -> Result<VaultDetail> {
        Ok(VaultDetail {
            safe_address: safe_address.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Source backed by the configured safe list.
///
/// Owner, balance and threshold lookups against the custody service are not
/// wired yet, so listing yields no records and per-address lookups echo the
/// address back.
#[derive(Debug, Clone)]
pub struct SafeListSource {
    safes: Vec<String>,
    api_url: String,
}

impl SafeListSource {
    pub fn new(config: &Config) -> Self {
        info!(
            "Safe list source configured with {} vault(s), custody API {} (key configured: {})",
            config.safe_list.len(),
            config.safe_api_url,
            config.safe_api_key.is_some()
        );
        Self {
            safes: config.safe_list.clone(),
            api_url: config.safe_api_url.clone(),
        }
    }
}

#[async_trait]
impl VaultSource for SafeListSource {
    async fn list_vaults(&self) -> Result<Vec<Vault>> {
        // TODO: resolve each configured safe through vault_by_address once the custody API returns owners and balances.
        debug!(
            "Skipping custody lookup for {} safe(s) at {}",
            self.safes.len(),
            self.api_url
        );
        Ok(Vec::new())
    }

    async fn vault_by_address(&self, safe_address: &str) -> Result<VaultDetail> {
        Ok(VaultDetail {
            safe_address: safe_address.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "safe-list"
    }
}
