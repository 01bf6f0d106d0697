//! # SortCopy - Concurrent Extension-Bucket File Sorter
//!
//! SortCopy recursively scans a source directory tree and copies each
//! regular file into a destination tree reorganized by file extension:
//! one subdirectory per extension, `no_ext` for extensionless files.
//! Traversal and per-file copies run concurrently, with the number of
//! in-flight copies bounded by a configurable limit.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sortcopy::core::sort_tree;
//! use std::path::Path;
//!
//! # async fn run() -> sortcopy::error::Result<()> {
//! let summary = sort_tree(Path::new("/data"), Path::new("/sorted")).await?;
//! println!("Copied {} files ({} bytes)", summary.files_copied, summary.bytes_copied);
//! # Ok(())
//! # }
//! ```
//!
//! ## Advanced Usage
//!
//! ```no_run
//! use sortcopy::config::SortConfig;
//! use sortcopy::core::SortEngine;
//! use std::path::PathBuf;
//!
//! # async fn run() -> sortcopy::error::Result<()> {
//! let config = SortConfig {
//!     source: PathBuf::from("/data"),
//!     output: PathBuf::from("/sorted"),
//!     jobs: 32,
//!     ..Default::default()
//! };
//! config.validate()?;
//!
//! let engine = SortEngine::new(config);
//! let summary = engine.execute().await?;
//! summary.print_summary();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::SortConfig;
pub use core::{sort_tree, SortEngine};
pub use error::{Result, SortCopyError};
pub use progress::{Reporter, RunSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use sortcopy::prelude::*;
    //! ```

    pub use crate::config::{CliArgs, SortConfig};
    pub use crate::core::{bucket_name, sort_tree, Copier, SortEngine, Walker};
    pub use crate::error::{Result, SortCopyError};
    pub use crate::progress::{Reporter, RunSummary};
}
