//! Recursive directory walker
//!
//! Walks the source tree depth-first. Each directory is listed in a single
//! snapshot on the blocking worker pool, subdirectories are recursed into
//! in place, and every regular file is dispatched as a concurrent copy
//! task. A level does not return until all copy tasks it spawned have
//! finished, so no task ever outlives the traversal call that created it.

use crate::core::Copier;
use crate::error::{IoResultExt, Result, SortCopyError};
use crate::progress::Reporter;
use futures::future::{BoxFuture, FutureExt};
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

/// Recursive traversal engine dispatching bounded concurrent copy tasks
pub struct Walker {
    /// Copier shared by all dispatched tasks
    copier: Arc<Copier>,
    /// Outcome sink
    reporter: Arc<Reporter>,
    /// Caps the number of copies in flight across the whole run
    permits: Arc<Semaphore>,
}

impl Walker {
    /// Create a walker dispatching to `copier`, with at most
    /// `max_in_flight` copies running at once
    pub fn new(copier: Arc<Copier>, reporter: Arc<Reporter>, max_in_flight: usize) -> Self {
        Self {
            copier,
            reporter,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Walk the source tree rooted at `source_dir` and dispatch one copy
    /// task per regular file found.
    ///
    /// Returns the number of files dispatched. By the time this returns,
    /// every dispatched copy has either completed or been reported as a
    /// failure. An error here means the root itself could not be listed;
    /// deeper listing failures only skip their own subtree.
    pub async fn walk(&self, source_dir: &Path) -> Result<u64> {
        self.walk_dir(source_dir.to_path_buf()).await
    }

    /// Process one directory level: snapshot, recurse, dispatch, join.
    ///
    /// Errs only when `dir` itself cannot be listed. The recursion arm
    /// below catches that error for child directories, which is what
    /// bounds a listing failure to its own subtree.
    fn walk_dir(&self, dir: PathBuf) -> BoxFuture<'_, Result<u64>> {
        async move {
            let entries = snapshot(&dir).await?;

            let mut copies = JoinSet::new();
            let mut dispatched = 0u64;

            for (path, kind) in entries {
                if kind.is_dir() {
                    match self.walk_dir(path.clone()).await {
                        Ok(count) => dispatched += count,
                        Err(err) => self.reporter.subtree_skipped(&path, &err),
                    }
                } else if kind.is_file() {
                    let permit = Arc::clone(&self.permits)
                        .acquire_owned()
                        .await
                        .expect("copy semaphore never closed");
                    let copier = Arc::clone(&self.copier);
                    copies.spawn(async move {
                        copier.copy_file(&path).await;
                        drop(permit);
                    });
                    dispatched += 1;
                } else {
                    // Symlinks and other special entries are not followed.
                    self.reporter.entry_skipped(&path);
                }
            }

            // Structured join: this level's copies finish before it returns.
            while let Some(joined) = copies.join_next().await {
                if let Err(err) = joined {
                    self.reporter.copy_task_lost(&err.to_string());
                }
            }

            Ok(dispatched)
        }
        .boxed()
    }
}

/// List a directory's immediate entries in one snapshot on the blocking
/// worker pool. Entries added or removed afterwards are not observed.
///
/// The file type is the entry's own (symlinks are not traversed), so a
/// symlinked directory cycle can never recurse.
async fn snapshot(dir: &Path) -> Result<Vec<(PathBuf, FileType)>> {
    let dir = dir.to_path_buf();
    task::spawn_blocking(move || -> Result<Vec<(PathBuf, FileType)>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir).with_path(&dir)? {
            let entry = entry.with_path(&dir)?;
            let kind = entry.file_type().with_path(entry.path())?;
            entries.push((entry.path(), kind));
        }
        Ok(entries)
    })
    .await
    .map_err(|e| SortCopyError::ThreadPoolError(e.to_string()))?
}
