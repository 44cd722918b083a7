//! Configuration types for the dynamic DNS updater
//!
//! The configuration is read once per run from a TOML file and is
//! read-only afterwards. Required keys have no defaults; a missing key
//! aborts the run before any network call.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Cloudflare API base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Plain-text IP echo service
pub const DEFAULT_IP_ECHO_URL: &str = "http://ipv4.icanhazip.com";

/// Default HTTP timeout for every outbound request (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default log directory, relative to the working directory
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Main updater configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DyndnsConfig {
    /// Provider credentials and identifiers
    pub cloudflare: CloudflareConfig,

    /// Log retention policy
    pub log_retention: LogRetentionConfig,

    /// Log directory settings
    #[serde(default)]
    pub logs: LogsConfig,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl DyndnsConfig {
    /// Load and validate the configuration file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Unable to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DyndnsConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cloudflare.validate()?;
        self.http.validate()?;

        if self.logs.dir.as_os_str().is_empty() {
            return Err(Error::config("logs.dir cannot be empty"));
        }

        Ok(())
    }

    pub fn zone_name(&self) -> &str {
        &self.cloudflare.zone_name
    }

    pub fn record_name(&self) -> &str {
        &self.cloudflare.record_name
    }

    pub fn api_token(&self) -> &str {
        &self.cloudflare.api_token
    }

    pub fn api_base(&self) -> &str {
        &self.cloudflare.api_base
    }

    pub fn log_retention_days(&self) -> u32 {
        self.log_retention.days
    }

    pub fn log_dir(&self) -> &Path {
        &self.logs.dir
    }

    pub fn ip_echo_url(&self) -> &str {
        &self.http.ip_echo_url
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

/// Cloudflare credentials and identifiers
///
/// The Debug implementation intentionally does NOT expose the API token.
#[derive(Clone, Deserialize)]
pub struct CloudflareConfig {
    /// Zone name (e.g., "example.com")
    pub zone_name: String,

    /// Fully-qualified record name (e.g., "home.example.com")
    pub record_name: String,

    /// Cloudflare API token with Zone:DNS:Edit permissions
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// API base URL, overridable for testing
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl CloudflareConfig {
    fn validate(&self) -> Result<()> {
        if self.zone_name.trim().is_empty() {
            return Err(Error::config("cloudflare.zone_name cannot be empty"));
        }
        if self.record_name.trim().is_empty() {
            return Err(Error::config("cloudflare.record_name cannot be empty"));
        }
        if self.api_token.trim().is_empty() {
            return Err(Error::config("cloudflare.api_token cannot be empty"));
        }
        validate_http_url("cloudflare.api_base", &self.api_base)
    }
}

impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("zone_name", &self.zone_name)
            .field("record_name", &self.record_name)
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Log retention policy
#[derive(Debug, Clone, Deserialize)]
pub struct LogRetentionConfig {
    /// Log files older than this many days are deleted on every run
    pub days: u32,
}

/// Log directory settings
#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Timeout applied to every request, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    /// URL of the plain-text IP echo service
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
}

impl HttpConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be > 0"));
        }
        validate_http_url("http.ip_echo_url", &self.ip_echo_url)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            ip_echo_url: default_ip_echo_url(),
        }
    }
}

fn validate_http_url(key: &str, url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            key, url
        )));
    }
    Ok(())
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_ip_echo_url() -> String {
    DEFAULT_IP_ECHO_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}
