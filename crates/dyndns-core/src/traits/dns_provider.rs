// # DNS Provider Trait
//
// Defines the three sequential provider calls used to rewrite a record:
// zone lookup, record lookup, record update.
//
// ## Implementations
//
// - Cloudflare: `dyndns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{DnsProvider, RecordTarget};
//
// let zone_id = provider.zone_id("example.com").await?;
// let record_id = provider.record_id(&zone_id, "home.example.com").await?;
// let target = RecordTarget::new(zone_id, record_id, "home.example.com");
// provider.update_record(&target, "1.2.3.4".parse()?).await?;
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Identifiers of the record to rewrite
///
/// Produced by the two lookup calls and consumed by the update call.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    /// Provider zone identifier
    pub zone_id: String,
    /// Provider record identifier
    pub record_id: String,
    /// Fully-qualified record name
    pub record_name: String,
}

impl RecordTarget {
    pub fn new(
        zone_id: impl Into<String>,
        record_id: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_id: record_id.into(),
            record_name: record_name.into(),
        }
    }
}

/// Trait for DNS provider implementations
///
/// Each method performs exactly one API call. Providers never retry,
/// never cache identifiers between runs and never decide whether an
/// update is needed; that is owned by `DyndnsEngine`.
///
/// When a lookup matches more than one zone or record, the first element
/// of the provider's result list is used.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the zone identifier for `zone_name`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The identifier of the first matching zone
    /// - `Err(Error::LookupEmpty)`: If no zone matched
    /// - `Err(Error)`: If the request failed
    async fn zone_id(&self, zone_name: &str) -> Result<String, crate::Error>;

    /// Look up the record identifier for `record_name` within `zone_id`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The identifier of the first matching record
    /// - `Err(Error::LookupEmpty)`: If no record matched
    /// - `Err(Error)`: If the request failed
    async fn record_id(&self, zone_id: &str, record_name: &str) -> Result<String, crate::Error>;

    /// Replace the A record's address with `ip`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error)`: The update failed; the message carries the provider's response
    async fn update_record(&self, target: &RecordTarget, ip: Ipv4Addr) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
