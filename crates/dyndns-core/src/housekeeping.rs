// # Housekeeping
//
// Deletes log files whose last-modified time is older than the retention
// window. The scan is non-recursive: only regular files directly inside
// the log directory are considered, directories are skipped. Symlinks are
// judged by their target's metadata and removing one deletes the link
// only; a dangling link is skipped.
//
// Read, stat and delete failures propagate as `Error::Filesystem`.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::fs;

use crate::error::Result;
use crate::logger::RunLogger;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Log retention sweeper
#[derive(Debug, Clone)]
pub struct Housekeeper {
    dir: PathBuf,
    retention_days: u32,
}

impl Housekeeper {
    pub fn new(dir: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            dir: dir.into(),
            retention_days,
        }
    }

    /// Oldest modification time a file may have and still be kept
    pub fn cutoff(&self, now: SystemTime) -> SystemTime {
        let window = Duration::from_secs(u64::from(self.retention_days) * SECS_PER_DAY);
        now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// Delete every file strictly older than the cutoff
    ///
    /// Returns the number of files removed.
    pub async fn sweep(&self, now: SystemTime, logger: &RunLogger) -> Result<usize> {
        let cutoff = self.cutoff(now);
        tracing::debug!(
            "Sweeping {} (retention: {} days)",
            self.dir.display(),
            self.retention_days
        );

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            if metadata.modified()? < cutoff {
                logger.file_only(&format!(
                    "Removing old log file: {}",
                    entry.file_name().to_string_lossy()
                ));
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        if removed == 0 {
            logger.info("No old log files to remove");
        } else {
            logger.info(&format!("Removed {} old log file(s)", removed));
        }

        Ok(removed)
    }
}
