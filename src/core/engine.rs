//! Sort engine orchestration
//!
//! Wires the reporter, copier, and walker together for one run and turns
//! the outcome into a [`RunSummary`].

use crate::config::SortConfig;
use crate::core::{Copier, Walker};
use crate::error::Result;
use crate::progress::{Reporter, RunSummary};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main sort-copy engine
pub struct SortEngine {
    /// Configuration
    config: SortConfig,
    /// Outcome sink shared with the walker and copier
    reporter: Arc<Reporter>,
}

impl SortEngine {
    /// Create a new engine for the given configuration
    pub fn new(config: SortConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(Reporter::new()),
        }
    }

    /// Replace the reporter, e.g. to share one sink across runs
    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Handle to the engine's reporter
    pub fn reporter(&self) -> Arc<Reporter> {
        Arc::clone(&self.reporter)
    }

    /// Run the traversal and copy every discovered file.
    ///
    /// Assumes the preconditions enforced by [`SortConfig::validate`]:
    /// the source is an existing directory and the output root exists.
    /// Individual copy failures and skipped subtrees are recorded in the
    /// summary, not returned as errors; `Err` here means the source root
    /// itself could not be listed.
    pub async fn execute(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let jobs = self.config.effective_jobs();

        tracing::info!(
            "sorting '{}' into '{}' ({} copies in flight max)",
            self.config.source.display(),
            self.config.output.display(),
            jobs
        );

        let copier = Arc::new(Copier::new(
            self.config.output.clone(),
            self.config.buffer_size,
            Arc::clone(&self.reporter),
        ));
        let walker = Walker::new(copier, Arc::clone(&self.reporter), jobs);

        let dispatched = walker.walk(&self.config.source).await?;

        let summary = self.reporter.summarize(dispatched, start_time.elapsed());
        tracing::info!(
            "finished: {} of {} files copied, {} failed in {:.2?}",
            summary.files_copied,
            summary.files_dispatched,
            summary.files_failed,
            summary.duration
        );

        Ok(summary)
    }
}

/// Validate paths and sort `source` into `output` with default settings
pub async fn sort_tree(source: &Path, output: &Path) -> Result<RunSummary> {
    let config = SortConfig {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        ..Default::default()
    };
    config.validate()?;

    let engine = SortEngine::new(config);
    engine.execute().await
}
