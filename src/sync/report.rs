// appinfosync/src/sync/report.rs
use chrono::{DateTime, Local};
use std::fmt;

/// Per-run tallies. Every listed app ends up in exactly one of
/// `updated`, `up_to_date`, `skipped` or `failed`.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started_at: DateTime<Local>,
    pub listed: usize,
    pub updated: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            listed: 0,
            updated: 0,
            up_to_date: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Apps whose store version was compared.
    pub fn checked(&self) -> usize {
        self.updated + self.up_to_date + self.failed
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = Local::now() - self.started_at;
        write!(
            f,
            "{} listed, {} checked, {} updated, {} up to date, {} skipped, {} failed (started {}, took {}.{:03}s)",
            self.listed,
            self.checked(),
            self.updated,
            self.up_to_date,
            self.skipped,
            self.failed,
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            elapsed.num_seconds(),
            elapsed.num_milliseconds().rem_euclid(1000)
        )
    }
}
