//! Contract Test: Fatal vs Reported Failures
//!
//! Lookup failures are fatal: the run stops before any mutation and
//! before housekeeping. Update failures are reported: the error is
//! logged with the provider's message, housekeeping runs, and the run
//! completes normally.

mod common;

use common::*;
use dyndns_core::{Error, UpdateOutcome};
use std::net::Ipv4Addr;

const LOCAL: Ipv4Addr = Ipv4Addr::new(1, 2, 3, 4);
const REMOTE: Ipv4Addr = Ipv4Addr::new(5, 6, 7, 8);

#[tokio::test]
async fn empty_zone_lookup_stops_before_record_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockDnsProvider::new().with_zone(Step::Empty);
    let (engine, logger) = engine_with(FixedIpSource(LOCAL), FixedResolver(REMOTE), &provider, dir.path());

    let err = engine.run_once(false).await.unwrap_err();

    assert!(matches!(err, Error::LookupEmpty(_)), "unexpected error: {}", err);
    assert_eq!(provider.zone_call_count(), 1);
    assert_eq!(provider.record_call_count(), 0);
    assert_eq!(provider.update_call_count(), 0);

    let log = read_log(&logger);
    assert!(log.contains(":: ERROR :: Unable to retrieve Zone ID from cloudflare api"));
}

#[tokio::test]
async fn empty_record_lookup_makes_no_update() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockDnsProvider::new().with_record(Step::Empty);
    let (engine, logger) = engine_with(FixedIpSource(LOCAL), FixedResolver(REMOTE), &provider, dir.path());

    let err = engine.run_once(false).await.unwrap_err();

    assert!(matches!(err, Error::LookupEmpty(_)));
    assert_eq!(provider.record_call_count(), 1);
    assert_eq!(provider.update_call_count(), 0);
    assert!(read_log(&logger).contains("Unable to retrieve Record ID"));
}

#[tokio::test]
async fn failed_zone_lookup_skips_housekeeping() {
    let dir = tempfile::tempdir().unwrap();
    let stale = stale_log(dir.path(), "20200101-cloudflare-dyndns.log", 30);
    let provider = MockDnsProvider::new().with_zone(Step::Fail);
    let (engine, logger) = engine_with(FixedIpSource(LOCAL), FixedResolver(REMOTE), &provider, dir.path());

    let err = engine.run_once(false).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert!(stale.exists(), "housekeeping must not run after a fatal error");

    let log = read_log(&logger);
    assert!(log.contains("403 - forbidden"));
    assert!(!log.contains("Starting housekeeping"));
    assert!(!log.contains("End of session"));
}

#[tokio::test]
async fn failed_update_is_reported_and_housekeeping_runs() {
    let dir = tempfile::tempdir().unwrap();
    let stale = stale_log(dir.path(), "20200101-cloudflare-dyndns.log", 30);
    let provider = MockDnsProvider::new().with_update(Step::Fail);
    let (engine, logger) = engine_with(FixedIpSource(LOCAL), FixedResolver(REMOTE), &provider, dir.path());

    let report = engine.run_once(false).await.expect("update failure is not fatal");

    assert_eq!(provider.update_call_count(), 1);
    match &report.outcome {
        UpdateOutcome::Failed { message } => {
            assert!(message.contains("Content for A record is invalid"));
        }
        other => panic!("expected failed outcome, got {:?}", other),
    }
    assert_eq!(report.removed_logs, 1);
    assert!(!stale.exists());

    let log = read_log(&logger);
    assert!(log.contains(
        ":: ERROR :: Cannot update cloudflare DNS record 'home.example.com', message:"
    ));
    assert!(log.contains("Content for A record is invalid"));
    assert!(log.contains("Starting housekeeping"));
    assert!(log.contains("End of session"));
}

#[tokio::test]
async fn local_ip_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockDnsProvider::new();
    let (engine, logger) = engine_with(FailingIpSource, FixedResolver(REMOTE), &provider, dir.path());

    let err = engine.run_once(false).await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert_eq!(provider.total_call_count(), 0);
    assert!(read_log(&logger).contains(":: ERROR :: Unable to determine local IP"));
}

#[tokio::test]
async fn resolution_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockDnsProvider::new();
    let (engine, logger) = engine_with(FixedIpSource(LOCAL), FailingResolver, &provider, dir.path());

    let err = engine.run_once(true).await.unwrap_err();

    assert!(matches!(err, Error::Resolution(_)));
    assert_eq!(provider.total_call_count(), 0, "force mode still needs a remote address");
    assert!(read_log(&logger).contains("Unable to resolve 'home.example.com'"));
}

#[tokio::test]
async fn housekeeping_failure_is_fatal_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let provider = MockDnsProvider::new();
    let source = LogDirRemovingIpSource {
        ip: LOCAL,
        log_dir: log_dir.clone(),
    };
    let (engine, _logger) = engine_with(source, FixedResolver(LOCAL), &provider, &log_dir);

    let output = CapturedOutput::default();
    let writer = output.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = engine.run_once(false).await.unwrap_err();

    assert!(matches!(err, Error::Filesystem(_)), "unexpected error: {}", err);
    assert_eq!(provider.total_call_count(), 0);
    assert!(output.contents().contains("Housekeeping failed, message: Filesystem error"));
}
