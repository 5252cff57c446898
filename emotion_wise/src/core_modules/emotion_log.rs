// THEORY:
// The `emotion_log` module persists detections, but sparingly. Detections
// arrive at frame rate, while the log only wants a sample every few seconds,
// so the logger remembers when it last wrote and ignores everything until the
// configured interval has passed.
//
// Each record is written with an open-append-close cycle. No handle is held
// between writes, and a failed write leaves the gate untouched so the next
// detection tries again.

use crate::core_modules::emotion::Emotion;
use crate::error::LogError;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(15);
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// A record was appended and the gate moved to `now`.
    Written,
    /// The interval has not elapsed since the last record.
    Throttled,
}

/// Formats one log line, newline included.
pub fn format_record(timestamp: &DateTime<Local>, emotion: Emotion) -> String {
    format!("{}: {}\n", timestamp.format(TIMESTAMP_FORMAT), emotion)
}

/// Appends at most one record per interval to a text file.
#[derive(Debug, Clone)]
pub struct RateLimitedLogger {
    path: PathBuf,
    interval: Duration,
    last_write: DateTime<Local>,
}

impl RateLimitedLogger {
    /// `started_at` counts as the previous write, so the first record is due
    /// one interval after it.
    pub fn new(path: impl Into<PathBuf>, interval: Duration, started_at: DateTime<Local>) -> Self {
        Self {
            path: path.into(),
            interval,
            last_write: started_at,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_write(&self) -> DateTime<Local> {
        self.last_write
    }

    /// Whether a record taken at `now` would be written.
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        // A clock that went backwards yields a negative span, which never counts as due.
        match now.signed_duration_since(self.last_write).to_std() {
            Ok(elapsed) => elapsed >= self.interval,
            Err(_) => false,
        }
    }

    pub fn maybe_log(&mut self, emotion: Emotion, now: DateTime<Local>) -> Result<LogOutcome, LogError> {
        if !self.is_due(now) {
            return Ok(LogOutcome::Throttled);
        }
        self.append(&format_record(&now, emotion))?;
        self.last_write = now;
        Ok(LogOutcome::Written)
    }

    fn append(&self, record: &str) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogError::Open {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(record.as_bytes()).map_err(|source| LogError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
