// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare API v4 client used by the updater.
//
// ## Behaviour
//
// - One HTTP request per trait call, no retries, no caching
// - HTTP timeout configured explicitly (default 30 seconds)
// - Specific error messages for HTTP status codes (401/403, 404, 429, 5xx)
// - First element of a lookup result wins; extra matches are logged
// - Only A records are written
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dyndns_core::config::DyndnsConfig;
use dyndns_core::traits::{DnsProvider, RecordTarget};
use dyndns_core::{Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::net::Ipv4Addr;
use std::time::Duration;

const PROVIDER: &str = "cloudflare";

/// Cloudflare DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `api_base`: API base URL (normally [`dyndns_core::config::DEFAULT_API_BASE`])
    /// - `timeout`: Timeout applied to every request
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(
        api_token: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();

        // Validate token is not empty
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a provider from the updater configuration
    pub fn from_config(config: &DyndnsConfig) -> Result<Self> {
        Self::new(config.api_token(), config.api_base(), config.http_timeout())
    }

    /// Issue an authenticated list request and return the first result's `id`
    async fn first_id(&self, url: &str, name: &str, what: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(&[("name", name)])
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::network(format!("{} lookup request failed: {}", what, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read {} lookup response: {}", what, e)))?;

        if !status.is_success() {
            return Err(status_error(status, &body, &format!("{} lookup failed", what), name));
        }

        let json: Value = serde_json::from_str(&body)?;

        let results = json["result"].as_array().ok_or_else(|| {
            Error::provider(PROVIDER, "Invalid response format: result is not an array")
        })?;

        let first = results
            .first()
            .ok_or_else(|| Error::lookup_empty(format!("{} not found: {}", what, name)))?;

        if results.len() > 1 {
            tracing::warn!(
                "{} lookup for {} matched {} entries, using the first",
                what,
                name,
                results.len()
            );
        }

        let id = first["id"].as_str().ok_or_else(|| {
            Error::provider(
                PROVIDER,
                format!("Invalid response format: {} id is not a string", what),
            )
        })?;

        Ok(id.to_string())
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn zone_id(&self, zone_name: &str) -> Result<String> {
        tracing::debug!("Looking up zone ID for: {}", zone_name);

        let url = format!("{}/zones", self.api_base);
        let zone_id = self.first_id(&url, zone_name, "Zone").await?;

        tracing::debug!("Found zone ID: {}", zone_id);
        Ok(zone_id)
    }

    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn record_id(&self, zone_id: &str, record_name: &str) -> Result<String> {
        tracing::debug!("Looking up record ID: {}", record_name);

        let url = format!("{}/zones/{}/dns_records", self.api_base, zone_id);
        let record_id = self.first_id(&url, record_name, "DNS record").await?;

        tracing::debug!("Found record ID: {}", record_id);
        Ok(record_id)
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "id": "<zone_id>",
    ///   "type": "A",
    ///   "name": "home.example.com",
    ///   "content": "1.2.3.4"
    /// }
    /// ```
    async fn update_record(&self, target: &RecordTarget, ip: Ipv4Addr) -> Result<()> {
        tracing::info!("Updating Cloudflare DNS record: {} -> {}", target.record_name, ip);

        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.api_base, target.zone_id, target.record_id
        );

        let payload = serde_json::json!({
            "id": target.zone_id,
            "type": "A",
            "name": target.record_name,
            "content": ip.to_string(),
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("Update request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(status_error(
                status,
                &error_text,
                "Failed to update record",
                &target.record_name,
            ));
        }

        tracing::info!("DNS record updated successfully: {} -> {}", target.record_name, ip);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Map a non-success HTTP status to a provider error carrying the response body
fn status_error(status: StatusCode, error_text: &str, context: &str, name: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {} - {}",
            status, error_text
        ),
        404 => format!("{}: {} not found. Status: {} - {}", context, name, status, error_text),
        409 => format!(
            "Conflict: Record is being updated by another process. Status: {} - {}",
            status, error_text
        ),
        429 => format!(
            "Rate limit exceeded. Please retry later. Status: {} - {}",
            status, error_text
        ),
        500..=599 => format!(
            "Cloudflare server error (transient): {} - {}",
            status, error_text
        ),
        _ => format!("{}: {} - {}", context, status, error_text),
    };

    Error::provider(PROVIDER, message)
}
