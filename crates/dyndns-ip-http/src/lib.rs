// # HTTP IP Source
//
// This crate provides the two address lookups a run compares:
//
// - [`HttpIpSource`]: fetches the host's public IPv4 address from a
//   plain-text echo service (e.g., icanhazip.com, api.ipify.org)
// - [`SystemResolver`]: resolves the DNS record through the system
//   resolver, the same way any other program on the host would
//
// ## Architecture
//
// One request per call. No polling, no caching, no retries: the engine
// calls each lookup exactly once per run.

use dyndns_core::traits::{IpSource, RecordResolver};
use dyndns_core::{Error, Result};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "http://ipv4.icanhazip.com")
    /// - `timeout`: Whole-request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Querying current IP: GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("IP echo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "IP echo service returned HTTP {}",
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read IP echo response: {}", e)))?;

        parse_echo_body(&ip_text)
    }
}

/// Parse the echo service body as a single IPv4 address
fn parse_echo_body(body: &str) -> Result<Ipv4Addr> {
    let ip_text = body.trim();
    ip_text
        .parse()
        .map_err(|_| Error::network(format!("IP echo service returned a non-IPv4 body: {:?}", ip_text)))
}

/// Resolver backed by the operating system's name resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl RecordResolver for SystemResolver {
    async fn resolve(&self, record_name: &str) -> Result<Ipv4Addr> {
        tracing::debug!("Resolving {}", record_name);

        let addrs = tokio::net::lookup_host((record_name, 0))
            .await
            .map_err(|e| Error::resolution(format!("Failed to resolve {}: {}", record_name, e)))?;

        first_ipv4(addrs.map(|addr| addr.ip())).ok_or_else(|| {
            Error::resolution(format!("{} has no IPv4 address", record_name))
        })
    }
}

fn first_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(_) => None,
    })
}
