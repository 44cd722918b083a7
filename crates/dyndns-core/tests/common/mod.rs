//! Test doubles and common utilities for engine contract tests
//!
//! These doubles record every call so tests can assert which provider
//! operations a run performed and with which arguments.

#![allow(dead_code)]

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{DnsProvider, IpSource, RecordResolver, RecordTarget};
use dyndns_core::{DyndnsConfig, DyndnsEngine, RunLogger};
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IP source that always returns the same address
pub struct FixedIpSource(pub Ipv4Addr);

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        Ok(self.0)
    }
}

/// An IP source whose echo service is unreachable
pub struct FailingIpSource;

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        Err(Error::network("connection refused"))
    }
}

/// An IP source that removes the log directory before answering
pub struct LogDirRemovingIpSource {
    pub ip: Ipv4Addr,
    pub log_dir: std::path::PathBuf,
}

#[async_trait::async_trait]
impl IpSource for LogDirRemovingIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        std::fs::remove_dir_all(&self.log_dir)?;
        Ok(self.ip)
    }
}

/// A resolver that always returns the same address
pub struct FixedResolver(pub Ipv4Addr);

#[async_trait::async_trait]
impl RecordResolver for FixedResolver {
    async fn resolve(&self, _record_name: &str) -> Result<Ipv4Addr> {
        Ok(self.0)
    }
}

/// A resolver for a name that does not exist
pub struct FailingResolver;

#[async_trait::async_trait]
impl RecordResolver for FailingResolver {
    async fn resolve(&self, record_name: &str) -> Result<Ipv4Addr> {
        Err(Error::resolution(format!("no such host: {}", record_name)))
    }
}

/// How a MockDnsProvider step should behave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Succeed,
    Empty,
    Fail,
}

/// A mock DnsProvider that tracks calls
#[derive(Clone)]
pub struct MockDnsProvider {
    zone_step: Step,
    record_step: Step,
    update_step: Step,
    zone_call_count: Arc<AtomicUsize>,
    record_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    /// Addresses sent in update calls
    updated_contents: Arc<Mutex<Vec<Ipv4Addr>>>,
    /// Targets sent in update calls
    updated_targets: Arc<Mutex<Vec<RecordTarget>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            zone_step: Step::Succeed,
            record_step: Step::Succeed,
            update_step: Step::Succeed,
            zone_call_count: Arc::new(AtomicUsize::new(0)),
            record_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            updated_contents: Arc::new(Mutex::new(Vec::new())),
            updated_targets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_zone(mut self, step: Step) -> Self {
        self.zone_step = step;
        self
    }

    pub fn with_record(mut self, step: Step) -> Self {
        self.record_step = step;
        self
    }

    pub fn with_update(mut self, step: Step) -> Self {
        self.update_step = step;
        self
    }

    pub fn zone_call_count(&self) -> usize {
        self.zone_call_count.load(Ordering::SeqCst)
    }

    pub fn record_call_count(&self) -> usize {
        self.record_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn total_call_count(&self) -> usize {
        self.zone_call_count() + self.record_call_count() + self.update_call_count()
    }

    pub fn updated_contents(&self) -> Vec<Ipv4Addr> {
        self.updated_contents.lock().unwrap().clone()
    }

    pub fn updated_targets(&self) -> Vec<RecordTarget> {
        self.updated_targets.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn zone_id(&self, zone_name: &str) -> Result<String> {
        self.zone_call_count.fetch_add(1, Ordering::SeqCst);
        match self.zone_step {
            Step::Succeed => Ok("zone-123".to_string()),
            Step::Empty => Err(Error::lookup_empty(format!("Zone not found: {}", zone_name))),
            Step::Fail => Err(Error::provider("mock", "Zone lookup failed: 403 - forbidden")),
        }
    }

    async fn record_id(&self, _zone_id: &str, record_name: &str) -> Result<String> {
        self.record_call_count.fetch_add(1, Ordering::SeqCst);
        match self.record_step {
            Step::Succeed => Ok("record-456".to_string()),
            Step::Empty => Err(Error::lookup_empty(format!(
                "DNS record not found: {}",
                record_name
            ))),
            Step::Fail => Err(Error::provider("mock", "Record lookup failed: 500 - oops")),
        }
    }

    async fn update_record(&self, target: &RecordTarget, ip: Ipv4Addr) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updated_contents.lock().unwrap().push(ip);
        self.updated_targets.lock().unwrap().push(target.clone());
        match self.update_step {
            Step::Succeed => Ok(()),
            Step::Empty | Step::Fail => Err(Error::provider(
                "mock",
                "Failed to update record: 400 - Content for A record is invalid",
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Minimal configuration for tests
pub fn minimal_config(retention_days: u32) -> DyndnsConfig {
    DyndnsConfig::from_toml(&format!(
        r#"
[cloudflare]
zone_name = "example.com"
record_name = "home.example.com"
api_token = "test_token"

[log_retention]
days = {}
"#,
        retention_days
    ))
    .expect("test config is valid")
}

/// Build an engine logging into `log_dir`
pub fn engine_with(
    ip_source: impl IpSource + 'static,
    resolver: impl RecordResolver + 'static,
    provider: &MockDnsProvider,
    log_dir: &Path,
) -> (DyndnsEngine, RunLogger) {
    let logger = RunLogger::open(log_dir)
        .expect("log directory opens")
        .without_stdout();

    let engine = DyndnsEngine::new(
        Box::new(ip_source),
        Box::new(resolver),
        Box::new(provider.clone()),
        logger.clone(),
        &minimal_config(7),
    );

    (engine, logger)
}

/// Contents of today's log file
pub fn read_log(logger: &RunLogger) -> String {
    std::fs::read_to_string(logger.current_file()).expect("log file readable")
}

/// Create a log file whose modification time is `days` days in the past
pub fn stale_log(dir: &Path, name: &str, days: u64) -> std::path::PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("create stale log");
    let age = std::time::Duration::from_secs(days * 24 * 60 * 60);
    file.set_modified(std::time::SystemTime::now() - age)
        .expect("set mtime");
    path
}

/// In-memory writer for capturing `tracing` output
#[derive(Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl std::io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
