//! Single-shot update engine
//!
//! The DyndnsEngine performs one check-and-maybe-update cycle:
//! - Determine the local address via IpSource
//! - Resolve the published address via RecordResolver
//! - Decide whether an update is needed
//! - Look up zone and record, then rewrite the record via DnsProvider
//! - Sweep old log files
//!
//! ## Event Flow
//!
//! ```text
//! IpSource ──┐
//!            ├─▶ UpdateDecision ──▶ zone_id ──▶ record_id ──▶ update_record
//! Resolver ──┘         │                                          │
//!                      └──────────────▶ Housekeeper ◀─────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! Address and lookup failures are fatal: they are logged and returned
//! immediately, before any mutation and before housekeeping. A failed
//! update call is only reported; the run still sweeps logs and completes.

use std::net::Ipv4Addr;
use std::time::SystemTime;
use tracing::debug;

use crate::config::DyndnsConfig;
use crate::decision::UpdateDecision;
use crate::error::Result;
use crate::housekeeping::Housekeeper;
use crate::logger::RunLogger;
use crate::traits::{DnsProvider, IpSource, RecordResolver, RecordTarget};

/// Result of the update step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No update was needed
    Skipped,
    /// The provider accepted the new address
    Updated { target: RecordTarget },
    /// The provider rejected the update; the run continued
    Failed { message: String },
}

/// Summary of one completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub local_ip: Ipv4Addr,
    pub remote_ip: Ipv4Addr,
    pub decision: UpdateDecision,
    pub outcome: UpdateOutcome,
    /// Number of log files removed by housekeeping
    pub removed_logs: usize,
}

/// Single-shot dynamic DNS engine
pub struct DyndnsEngine {
    /// Source of the host's public address
    ip_source: Box<dyn IpSource>,

    /// Resolver for the record's published address
    resolver: Box<dyn RecordResolver>,

    /// DNS provider for rewriting the record
    provider: Box<dyn DnsProvider>,

    /// Log retention sweeper
    housekeeper: Housekeeper,

    /// Run log shared by every step
    logger: RunLogger,

    zone_name: String,
    record_name: String,
}

impl DyndnsEngine {
    /// Create a new engine
    ///
    /// Housekeeping sweeps the logger's directory using the configured
    /// retention window.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        resolver: Box<dyn RecordResolver>,
        provider: Box<dyn DnsProvider>,
        logger: RunLogger,
        config: &DyndnsConfig,
    ) -> Self {
        let housekeeper = Housekeeper::new(logger.dir(), config.log_retention_days());

        Self {
            ip_source,
            resolver,
            provider,
            housekeeper,
            logger,
            zone_name: config.zone_name().to_string(),
            record_name: config.record_name().to_string(),
        }
    }

    /// Run one check-and-maybe-update cycle
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: The run completed, including runs whose update call failed
    /// - `Err(Error)`: A fatal error stopped the run before housekeeping
    pub async fn run_once(&self, force: bool) -> Result<RunReport> {
        self.logger.session_started();

        let local_ip = self.fatal(self.ip_source.current().await, "Unable to determine local IP")?;
        let remote_ip = self.fatal(
            self.resolver.resolve(&self.record_name).await,
            &format!("Unable to resolve '{}'", self.record_name),
        )?;
        self.logger
            .info(&format!("Local IP: {}, Remote IP: {}", local_ip, remote_ip));

        let decision = UpdateDecision::evaluate(local_ip, remote_ip, force);
        self.logger.info(decision.message());

        let outcome = if decision.requires_update() {
            let target = self.lookup_target().await?;
            self.apply_update(&target, local_ip).await
        } else {
            UpdateOutcome::Skipped
        };

        self.logger.info("Starting housekeeping");
        let removed_logs = self.fatal(
            self.housekeeper.sweep(SystemTime::now(), &self.logger).await,
            "Housekeeping failed",
        )?;

        self.logger.session_ended();

        Ok(RunReport {
            local_ip,
            remote_ip,
            decision,
            outcome,
            removed_logs,
        })
    }

    /// Zone and record lookups; any failure ends the run
    async fn lookup_target(&self) -> Result<RecordTarget> {
        let provider = self.provider.provider_name();

        self.logger.info("Starting GET request for Zone ID");
        let zone_id = self.fatal(
            self.provider.zone_id(&self.zone_name).await,
            &format!("Unable to retrieve Zone ID from {} api", provider),
        )?;
        debug!("Zone ID for {}: {}", self.zone_name, zone_id);

        self.logger.info("Starting GET request for Record ID");
        let record_id = self.fatal(
            self.provider.record_id(&zone_id, &self.record_name).await,
            &format!("Unable to retrieve Record ID from {} api", provider),
        )?;
        debug!("Record ID for {}: {}", self.record_name, record_id);

        Ok(RecordTarget::new(zone_id, record_id, &self.record_name))
    }

    /// Record update; failure is reported, never propagated
    async fn apply_update(&self, target: &RecordTarget, ip: Ipv4Addr) -> UpdateOutcome {
        let provider = self.provider.provider_name();

        self.logger.info("Starting PUT request to update DNS record");
        match self.provider.update_record(target, ip).await {
            Ok(()) => {
                self.logger.info(&format!(
                    "Successfully updated {} DNS record '{}' with '{}'",
                    provider, target.record_name, ip
                ));
                UpdateOutcome::Updated {
                    target: target.clone(),
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.logger.error(&format!(
                    "Cannot update {} DNS record '{}', message: {}",
                    provider, target.record_name, message
                ));
                UpdateOutcome::Failed { message }
            }
        }
    }

    /// Log a fatal error with context and pass the result through
    fn fatal<T>(&self, result: Result<T>, context: &str) -> Result<T> {
        if let Err(ref e) = result {
            self.logger.error(&format!("{}, message: {}", context, e));
        }
        result
    }
}
