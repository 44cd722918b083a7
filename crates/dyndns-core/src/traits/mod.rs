//! Core traits for the dynamic DNS updater
//!
//! This module defines the abstract interfaces the engine is driven through.
//!
//! - [`IpSource`]: Determine the host's current public address
//! - [`RecordResolver`]: Resolve the address the DNS record currently points at
//! - [`DnsProvider`]: Look up and rewrite the record via the provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, RecordResolver};
pub use dns_provider::{DnsProvider, RecordTarget};
