//! Update decision
//!
//! Compares the local and remote addresses and decides whether the DNS
//! record has to be rewritten. Force-update mode overrides the comparison.

use std::net::Ipv4Addr;

/// Returns true when the record must be updated
pub fn should_update(local: Ipv4Addr, remote: Ipv4Addr, force: bool) -> bool {
    force || local != remote
}

/// Outcome of comparing the local and remote addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Addresses match, nothing to do
    NoChange,
    /// Addresses differ, update required
    Changed,
    /// Force-update mode, update regardless of the comparison
    Forced,
}

impl UpdateDecision {
    pub fn evaluate(local: Ipv4Addr, remote: Ipv4Addr, force: bool) -> Self {
        if force {
            UpdateDecision::Forced
        } else if local != remote {
            UpdateDecision::Changed
        } else {
            UpdateDecision::NoChange
        }
    }

    pub fn requires_update(&self) -> bool {
        !matches!(self, UpdateDecision::NoChange)
    }

    /// Run log message describing the decision
    pub fn message(&self) -> &'static str {
        match self {
            UpdateDecision::NoChange => "Local IP is the same as Remote IP, NO CHANGE required",
            UpdateDecision::Changed => "Local IP is different to Remote IP, WILL UPDATE Cloudflare",
            UpdateDecision::Forced => "FORCED UPDATE MODE ACTIVE - Updating Cloudflare regardless.",
        }
    }
}
