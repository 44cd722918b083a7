// # Run Logger
//
// Writes the human-facing run log: every message goes to stdout and is
// appended to a per-day file in the log directory as
//
// ```text
// 2025-01-09 12:00:00,123 :: INFO :: Local IP: 1.2.3.4, Remote IP: 1.2.3.4
// ```
//
// The logger is an explicit instance handed to the engine and the
// housekeeper; there is no process-wide logging state. Every message is
// also mirrored to `tracing` at INFO, whatever its run-log level, so the
// default WARN stderr subscriber does not repeat the stdout lines.
//
// File writes are best-effort. A failed append is reported through
// `tracing::warn!` and never aborts the run.

use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix of every daily log file name
pub const LOG_FILE_SUFFIX: &str = "-cloudflare-dyndns.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Severity of a run log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Daily log file writer with stdout mirroring
#[derive(Debug, Clone)]
pub struct RunLogger {
    dir: PathBuf,
    echo_stdout: bool,
}

impl RunLogger {
    /// Open the logger rooted at `dir`
    ///
    /// Creates the directory and today's log file if they do not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let logger = Self {
            dir,
            echo_stdout: true,
        };

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(logger.current_file())?;

        Ok(logger)
    }

    /// Disable stdout mirroring (file and tracing output are kept)
    pub fn without_stdout(mut self) -> Self {
        self.echo_stdout = false;
        self
    }

    /// Log directory this logger writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for the current calendar day
    pub fn current_file(&self) -> PathBuf {
        self.dir.join(log_file_name(Local::now().date_naive()))
    }

    /// Print `message` and append it to the day's log file
    ///
    /// `is_error` selects the ERROR level, otherwise INFO.
    pub fn log(&self, message: &str, is_error: bool) {
        let level = if is_error {
            LogLevel::Error
        } else {
            LogLevel::Info
        };

        if self.echo_stdout {
            match level {
                LogLevel::Error => println!("ERROR: {}", message),
                LogLevel::Info => println!("{}", message),
            }
        }

        // Already on stdout; keep the mirror below the default stderr filter
        tracing::info!(level = level.as_str(), "{}", message);

        self.append(level, message);
    }

    pub fn info(&self, message: &str) {
        self.log(message, false);
    }

    pub fn error(&self, message: &str) {
        self.log(message, true);
    }

    /// Append an INFO line to the log file without printing it
    pub fn file_only(&self, message: &str) {
        tracing::debug!("{}", message);
        self.append(LogLevel::Info, message);
    }

    pub fn session_started(&self) {
        self.file_only(" - Started new session. ---");
    }

    pub fn session_ended(&self) {
        self.file_only(" --- End of session. -");
    }

    fn append(&self, level: LogLevel, message: &str) {
        let path = self.current_file();
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT).to_string(), level, message);

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = written {
            tracing::warn!("Failed to write log file {}: {}", path.display(), e);
        }
    }
}

/// Name of the log file for `date`, e.g. `20250109-cloudflare-dyndns.log`
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y%m%d"), LOG_FILE_SUFFIX)
}

fn format_line(timestamp: &str, level: LogLevel, message: &str) -> String {
    format!("{} :: {} :: {}\n", timestamp, level.as_str(), message)
}
