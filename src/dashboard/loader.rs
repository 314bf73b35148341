use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::render::LOCAL_TIME_FORMAT;
use super::state::Snapshot;
use crate::aggregator::summarize;
use crate::config::DashboardConfig;
use crate::error::{Result, VaultError};
use crate::models::{PoolSummary, Student, Vault};

/// Where the dashboard gets vault data for a loaded student list.
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    async fn load(&self, students: &[Student]) -> Result<(Vec<Vault>, PoolSummary)>;

    fn name(&self) -> &'static str;
}

/// Generates one randomized vault per student, for use before a proxy exists.
#[derive(Debug, Default, Clone)]
pub struct MockPoolData;

pub fn mock_vaults<R: Rng>(students: &[Student], rng: &mut R, now: DateTime<Utc>) -> Vec<Vault> {
    students
        .iter()
        .map(|s| {
            let pol = rng.gen_range(10.0..260.0);
            let usd = rng.gen_range(2.5..252.5);
            Vault::for_student(s, pol, usd, now)
        })
        .collect()
}

#[async_trait]
impl PoolDataSource for MockPoolData {
    async fn load(&self, students: &[Student]) -> Result<(Vec<Vault>, PoolSummary)> {
        let vaults = mock_vaults(students, &mut rand::thread_rng(), Utc::now());
        let summary = summarize(&vaults, Local::now().format(LOCAL_TIME_FORMAT).to_string());
        Ok((vaults, summary))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Reads the summary and vault list from the proxy backend.
#[derive(Debug, Clone)]
pub struct ProxyPoolData {
    client: reqwest::Client,
    base: String,
}

impl ProxyPoolData {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(VaultError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PoolDataSource for ProxyPoolData {
    async fn load(&self, _students: &[Student]) -> Result<(Vec<Vault>, PoolSummary)> {
        let (summary, vaults) = futures::try_join!(
            self.get_json::<PoolSummary>("/api/poolSummary"),
            self.get_json::<Vec<Vault>>("/api/vaults"),
        )?;
        Ok((vaults, summary))
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

pub async fn load_students(path: &Path) -> Result<Vec<Student>> {
    let raw = tokio::fs::read(path).await?;
    let students: Vec<Student> = serde_json::from_slice(&raw)?;
    Ok(students)
}

/// Loads students, then vault data, into a fresh [`Snapshot`].
#[derive(Clone)]
pub struct DashboardLoader {
    students_path: PathBuf,
    source: Arc<dyn PoolDataSource>,
}

impl DashboardLoader {
    pub fn new(students_path: impl Into<PathBuf>, source: Arc<dyn PoolDataSource>) -> Self {
        Self {
            students_path: students_path.into(),
            source,
        }
    }

    /// Mock mode unless a proxy base is configured.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let source: Arc<dyn PoolDataSource> = match &config.proxy_base {
            Some(base) => Arc::new(ProxyPoolData::new(base.clone(), config.http_timeout)?),
            None => Arc::new(MockPoolData),
        };
        info!("Dashboard using {} vault data", source.name());
        Ok(Self::new(config.students_path.clone(), source))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn load(&self) -> Result<Snapshot> {
        let students = load_students(&self.students_path).await?;
        let (vaults, summary) = self.source.load(&students).await?;
        info!(
            "Loaded {} student(s) and {} vault(s) from {} source",
            students.len(),
            vaults.len(),
            self.source.name()
        );
        Ok(Snapshot {
            students,
            vaults,
            summary,
        })
    }
}
