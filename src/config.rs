use crate::error::{Result, VaultError};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Proxy backend configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Configured vault identifiers. Empty selects the mock fallback source.
    pub safe_list: Vec<String>,
    pub api_host: String,
    pub api_port: u16,
    pub safe_api_url: String,
    pub safe_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            safe_list: Vec::new(),
            api_host: "0.0.0.0".to_string(),
            api_port: 8787,
            safe_api_url: "https://safe-client.gnosis.io".to_string(),
            safe_api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            safe_list: parse_safe_list(&std::env::var("SAFE_LIST").unwrap_or_default()),
            api_host: std::env::var("API_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .map_err(|_| VaultError::ConfigurationError("Invalid API_PORT".to_string()))?,
            safe_api_url: std::env::var("SAFE_API_URL")
                .unwrap_or_else(|_| "https://safe-client.gnosis.io".to_string()),
            safe_api_key: std::env::var("SAFE_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.api_host, self.api_port)
            .parse()
            .map_err(|_| VaultError::ConfigurationError(format!("Invalid API_HOST: {}", self.api_host)))
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the proxy backend. `None` runs the dashboard in mock mode.
    pub proxy_base: Option<String>,
    pub students_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            proxy_base: None,
            students_path: PathBuf::from("./data/students.json"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let timeout_secs: u64 = std::env::var("HTTP_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| VaultError::ConfigurationError("Invalid HTTP_TIMEOUT_SECONDS".to_string()))?;

        Ok(Self {
            proxy_base: std::env::var("PROXY_BASE")
                .ok()
                .map(|base| base.trim().trim_end_matches('/').to_string())
                .filter(|base| !base.is_empty()),
            students_path: std::env::var("STUDENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/students.json")),
            host: std::env::var("DASHBOARD_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("DASHBOARD_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| VaultError::ConfigurationError("Invalid DASHBOARD_PORT".to_string()))?,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| VaultError::ConfigurationError(format!("Invalid DASHBOARD_HOST: {}", self.host)))
    }
}

/// Splits a comma-separated identifier list, dropping empty entries.
pub fn parse_safe_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
