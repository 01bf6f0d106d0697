//! Run reporter implementation
//!
//! The `Reporter` is the single sink for per-file and per-directory
//! outcomes. The walker and copier hold a shared handle to it instead of
//! logging through ambient global state, which keeps runs independently
//! countable and makes the counters directly assertable in tests. Each
//! event both bumps an atomic counter and emits one `tracing` record.

use crate::error::SortCopyError;
use humansize::{format_size, BINARY};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Event sink and outcome counters for one sort-copy run
#[derive(Debug, Default)]
pub struct Reporter {
    /// Files copied successfully
    files_copied: AtomicU64,
    /// Files whose copy failed
    files_failed: AtomicU64,
    /// Bytes copied successfully
    bytes_copied: AtomicU64,
    /// Directories skipped because they could not be listed
    dirs_skipped: AtomicU64,
    /// Entries skipped because they are neither file nor directory
    entries_skipped: AtomicU64,
}

impl Reporter {
    /// Create a new reporter with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful file copy
    pub fn copy_succeeded(&self, source: &Path, dest: &Path, bytes: u64) {
        self.files_copied.fetch_add(1, Ordering::Relaxed);
        self.bytes_copied.fetch_add(bytes, Ordering::Relaxed);
        tracing::info!("copied '{}' -> '{}'", source.display(), dest.display());
    }

    /// Record a failed file copy
    pub fn copy_failed(&self, source: &Path, err: &SortCopyError) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
        tracing::error!("failed to copy '{}': {}", source.display(), err);
    }

    /// Record a copy task that died without reporting its own outcome
    pub fn copy_task_lost(&self, detail: &str) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
        tracing::error!("copy task lost: {}", detail);
    }

    /// Record a subtree skipped because its directory could not be listed
    pub fn subtree_skipped(&self, dir: &Path, err: &SortCopyError) {
        self.dirs_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::error!("skipping subtree '{}': {}", dir.display(), err);
    }

    /// Record an entry skipped because it is neither a regular file nor
    /// a directory (symlinks, sockets, devices)
    pub fn entry_skipped(&self, path: &Path) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("skipping non-regular entry '{}'", path.display());
    }

    /// Files copied so far
    pub fn files_copied(&self) -> u64 {
        self.files_copied.load(Ordering::Relaxed)
    }

    /// Failed copies so far
    pub fn files_failed(&self) -> u64 {
        self.files_failed.load(Ordering::Relaxed)
    }

    /// Bytes copied so far
    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied.load(Ordering::Relaxed)
    }

    /// Subtrees skipped so far
    pub fn dirs_skipped(&self) -> u64 {
        self.dirs_skipped.load(Ordering::Relaxed)
    }

    /// Non-regular entries skipped so far
    pub fn entries_skipped(&self) -> u64 {
        self.entries_skipped.load(Ordering::Relaxed)
    }

    /// Snapshot the counters into a final run summary
    pub fn summarize(&self, files_dispatched: u64, duration: Duration) -> RunSummary {
        RunSummary {
            files_dispatched,
            files_copied: self.files_copied(),
            files_failed: self.files_failed(),
            bytes_copied: self.bytes_copied(),
            dirs_skipped: self.dirs_skipped(),
            entries_skipped: self.entries_skipped(),
            duration,
        }
    }
}

/// Final outcome of one sort-copy run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Copy tasks dispatched by the walker
    pub files_dispatched: u64,
    /// Files copied successfully
    pub files_copied: u64,
    /// Files whose copy failed
    pub files_failed: u64,
    /// Bytes copied successfully
    pub bytes_copied: u64,
    /// Directories skipped because they could not be listed
    pub dirs_skipped: u64,
    /// Entries skipped because they are neither file nor directory
    pub entries_skipped: u64,
    /// Total run duration
    pub duration: Duration,
}

impl RunSummary {
    /// Check if every discovered file was copied and no subtree skipped
    pub fn is_success(&self) -> bool {
        self.files_failed == 0 && self.dirs_skipped == 0
    }

    /// Average throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_copied as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Sort Summary ===");
        println!("Files copied:    {}", self.files_copied);
        println!("Bytes copied:    {}", format_size(self.bytes_copied, BINARY));
        println!("Duration:        {:.2?}", self.duration);
        println!(
            "Throughput:      {}/s",
            format_size(self.throughput() as u64, BINARY)
        );

        if self.files_failed > 0 {
            println!("Failed copies:   {} (see log)", self.files_failed);
        }
        if self.dirs_skipped > 0 {
            println!("Skipped subtrees: {} (see log)", self.dirs_skipped);
        }
    }
}
