// # dyndns-core
//
// Core library for the single-shot Cloudflare dynamic DNS updater.
//
// ## Architecture Overview
//
// One invocation runs one strictly sequential cycle:
// - **DyndnsConfig**: Immutable configuration loaded from a TOML file
// - **RunLogger**: Daily log file plus stdout, passed explicitly to each step
// - **IpSource / RecordResolver**: Local and published addresses
// - **UpdateDecision**: `force || local != remote`
// - **DnsProvider**: Zone lookup, record lookup, record update
// - **Housekeeper**: Deletes log files past the retention window
// - **DyndnsEngine**: Orchestrates the above and owns the failure policy
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Single-Shot**: No background tasks, no retries, no state between runs
// 3. **Library-First**: The binary is a thin integration layer

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod housekeeping;
pub mod logger;
pub mod traits;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpSource, RecordResolver, RecordTarget};
pub use engine::{DyndnsEngine, RunReport, UpdateOutcome};
pub use config::DyndnsConfig;
pub use decision::{UpdateDecision, should_update};
pub use error::{Error, Result};
pub use housekeeping::Housekeeper;
pub use logger::RunLogger;
