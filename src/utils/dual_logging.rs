use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::logging::LogEntry;
use crate::utils::app_paths::AppPaths;

/// Global dual logger instance
static DUAL_LOGGER: OnceLock<Option<DualLogger>> = OnceLock::new();

/// Log directory, falling back to the temp dir when the data dir is unusable
fn get_log_dir() -> PathBuf {
    AppPaths::log_dir().unwrap_or_else(|_| std::env::temp_dir().join("industry-lens"))
}

/// File half of the dual logging setup; the ring buffer half lives in `logging`
pub struct DualLogger {
    log_file: Mutex<File>,
    log_path: PathBuf,
}

impl DualLogger {
    /// Open a fresh timestamped log file in `log_dir`
    pub fn create_in(log_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("industry-lens_{}.log", timestamp));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        #[cfg(unix)]
        {
            // Point latest.log at this run for `tail -f`
            let latest_path = log_dir.join("latest.log");
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        Ok(Self {
            log_file: Mutex::new(log_file),
            log_path,
        })
    }

    pub fn write_entry(&self, entry: &LogEntry) {
        if let Ok(mut file) = self.log_file.lock() {
            let log_line = format!(
                "[{}] {} [{}] {}\n",
                entry.timestamp, entry.level, entry.target, entry.message
            );
            let _ = file.write_all(log_line.as_bytes());
        }
    }

    /// Get the log file path
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Force flush the log file
    pub fn flush(&self) {
        if let Ok(mut file) = self.log_file.lock() {
            let _ = file.flush();
        }
    }
}

/// Initialize the global dual logger. `None` when no log file could be opened.
pub fn init_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER
        .get_or_init(|| DualLogger::create_in(&get_log_dir()).ok())
        .as_ref()
}

/// Get the global dual logger
pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get().and_then(|logger| logger.as_ref())
}
