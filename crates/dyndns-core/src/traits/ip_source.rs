// # IP Source Traits
//
// Defines the two address lookups a run compares:
//
// - [`IpSource`]: the host's public IPv4 address, as seen from outside
// - [`RecordResolver`]: the IPv4 address the DNS record resolves to today
//
// ## Implementations
//
// - HTTP echo service and system resolver: `dyndns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{IpSource, RecordResolver};
//
// let local = source.current().await?;
// let remote = resolver.resolve("home.example.com").await?;
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Source of the host's current public address
///
/// Implementations perform a single lookup per call. They must not retry,
/// cache between runs, or decide whether an update is needed.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The current address
    /// - `Err(Error::Network)`: If the address could not be determined
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;
}

/// Resolver for the address currently published for a record
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Resolve `record_name` and return its first IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The first resolved address
    /// - `Err(Error::Resolution)`: If resolution failed or yielded no IPv4 address
    async fn resolve(&self, record_name: &str) -> Result<Ipv4Addr, crate::Error>;
}
