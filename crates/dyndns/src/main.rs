// # cloudflare-dyndns
//
// Thin integration layer: parse arguments, load configuration, wire the
// concrete IP source, resolver and provider into the engine, run one cycle,
// and map the outcome to an exit code. All update logic lives in
// dyndns-core.
//
// ## Usage
//
// ```bash
// # Check and update if the public IP changed (cron-friendly)
// cloudflare-dyndns --config /etc/dyndns/config.toml
//
// # Update regardless of the comparison
// cloudflare-dyndns --force-update
// ```
//
// ## Environment
//
// - `DYNDNS_LOG_LEVEL`: diagnostic log level on stderr (trace, debug, info,
//   warn, error). Defaults to warn; the run log itself always goes to
//   stdout and the daily log file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use dyndns_core::{DyndnsConfig, DyndnsEngine, RunLogger, RunReport};
use dyndns_ip_http::{HttpIpSource, SystemResolver};
use dyndns_provider_cloudflare::CloudflareProvider;

/// Exit codes for different termination scenarios
///
/// - 0: Run completed (a rejected update is reported, not fatal)
/// - 1: Configuration or startup error, nothing was sent
/// - 2: Fatal runtime error (address resolution or zone/record lookup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DyndnsExitCode {
    Completed = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "cloudflare-dyndns")]
#[command(about = "Keep a Cloudflare A record in sync with this host's public IP", long_about = None)]
#[command(version)]
struct Cli {
    /// Update the DNS record even if the published address already matches
    #[arg(long)]
    force_update: bool,

    /// Path to the configuration file
    #[arg(short, long, env = "DYNDNS_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Log directory (overrides `logs.dir` from the configuration)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    // Load configuration before anything touches the network
    let config = match DyndnsConfig::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| config.log_dir().to_path_buf());

    let logger = match RunLogger::open(&log_dir) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to open log directory {}: {}", log_dir.display(), e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    let engine = match build_engine(&config, logger) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Startup error: {:#}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    if cli.force_update {
        println!("FORCED UPDATE MODE");
        println!();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    // Fatal errors are already in the run log
    let result = rt.block_on(engine.run_once(cli.force_update));
    exit_code_for(&result).into()
}

/// Map a finished run to its exit code
///
/// A rejected update still completes the run; only errors that stopped
/// the run are failures.
fn exit_code_for(result: &dyndns_core::Result<RunReport>) -> DyndnsExitCode {
    match result {
        Ok(_) => DyndnsExitCode::Completed,
        Err(e) if e.is_config() => DyndnsExitCode::ConfigError,
        Err(_) => DyndnsExitCode::RuntimeError,
    }
}

/// Wire the concrete collaborators into the engine
fn build_engine(config: &DyndnsConfig, logger: RunLogger) -> Result<DyndnsEngine> {
    let ip_source = HttpIpSource::with_timeout(config.ip_echo_url(), config.http_timeout())
        .context("Failed to create IP echo client")?;
    let provider =
        CloudflareProvider::from_config(config).context("Failed to create Cloudflare client")?;

    Ok(DyndnsEngine::new(
        Box::new(ip_source),
        Box::new(SystemResolver::new()),
        Box::new(provider),
        logger,
        config,
    ))
}

/// Initialize diagnostic tracing on stderr
fn init_tracing() {
    let log_level = match std::env::var("DYNDNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
