//! Configuration settings for SortCopy
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for the sort-copy operation.

use crate::error::{IoResultExt, Result, SortCopyError};
use clap::Parser;
use std::path::PathBuf;

/// Default chunk size for streaming copies (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// SortCopy - Concurrent file organizer
#[derive(Parser, Debug, Clone)]
#[command(name = "sortcopy")]
#[command(author = "SortCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy a directory tree into per-extension buckets, concurrently")]
#[command(long_about = r#"
SortCopy recursively scans a source directory and copies every regular file
into the output directory, grouped into one subdirectory per file extension.
Files without an extension land in the 'no_ext' bucket. Source subdirectory
structure is flattened; only the extension decides placement.

Traversal and per-file copies run concurrently. The number of copies in
flight at once is bounded by --jobs.

Examples:
  sortcopy --source ~/Downloads --output ~/sorted
  sortcopy -s /data -o /srv/buckets -j 32
  sortcopy -s /data -o /srv/buckets -b 1M -vv
"#)]
pub struct CliArgs {
    /// Source directory to scan
    #[arg(short = 's', long, value_name = "PATH")]
    pub source: PathBuf,

    /// Output directory for extension buckets (created if absent)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: PathBuf,

    /// Maximum number of copies in flight (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0", value_name = "NUM")]
    pub jobs: usize,

    /// Chunk size for streaming copies (e.g. 64K, 1M)
    #[arg(short = 'b', long, default_value = "64K", value_name = "SIZE")]
    pub buffer_size: String,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Runtime configuration for a sort-copy run
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Source directory
    pub source: PathBuf,
    /// Output root for extension buckets
    pub output: PathBuf,
    /// Maximum copies in flight (0 = auto-detect)
    pub jobs: usize,
    /// Chunk size in bytes for streaming copies
    pub buffer_size: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            output: PathBuf::new(),
            jobs: 0,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl SortConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| SortCopyError::config(format!("Invalid buffer size: {}", e)))?
            as usize;
        if buffer_size == 0 {
            return Err(SortCopyError::config("Buffer size must be non-zero"));
        }

        Ok(Self {
            source: args.source.clone(),
            output: args.output.clone(),
            jobs: args.jobs,
            buffer_size,
        })
    }

    /// Resolve the effective concurrency limit
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            // Copies are I/O bound; oversubscribe the cores.
            num_cpus::get() * 4
        } else {
            self.jobs
        }
    }

    /// Enforce run preconditions: the source must exist and be a
    /// directory, and the output root is created if absent.
    ///
    /// An output located at or inside the source tree is rejected, since
    /// the walker would rediscover freshly written bucket files mid-run.
    pub fn validate(&self) -> Result<()> {
        let meta = match std::fs::metadata(&self.source) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SortCopyError::NotFound(self.source.clone()));
            }
            Err(e) => return Err(SortCopyError::io(&self.source, e)),
        };
        if !meta.is_dir() {
            return Err(SortCopyError::NotADirectory(self.source.clone()));
        }

        std::fs::create_dir_all(&self.output).with_path(&self.output)?;

        let source = std::fs::canonicalize(&self.source).with_path(&self.source)?;
        let output = std::fs::canonicalize(&self.output).with_path(&self.output)?;
        if output.starts_with(&source) {
            return Err(SortCopyError::OutputInsideSource(self.output.clone()));
        }

        Ok(())
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> std::result::Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        let num = size.trim_end_matches(|c| c == 'G' || c == 'B');
        (num.to_string(), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        let num = size.trim_end_matches(|c| c == 'M' || c == 'B');
        (num.to_string(), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        let num = size.trim_end_matches(|c| c == 'K' || c == 'B');
        (num.to_string(), 1024u64)
    } else if size.ends_with('B') {
        let num = size.trim_end_matches('B');
        (num.to_string(), 1u64)
    } else {
        // Assume bytes if no suffix
        (size, 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64KB").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5M").unwrap(), (1.5 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
    }

    #[test]
    fn test_from_cli() {
        let args = CliArgs::parse_from(["sortcopy", "--source", "/src", "--output", "/dst"]);
        let config = SortConfig::from_cli(&args).unwrap();
        assert_eq!(config.source, PathBuf::from("/src"));
        assert_eq!(config.output, PathBuf::from("/dst"));
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.jobs, 0);
        assert!(config.effective_jobs() > 0);
    }

    #[test]
    fn test_from_cli_rejects_zero_buffer() {
        let args =
            CliArgs::parse_from(["sortcopy", "-s", "/src", "-o", "/dst", "-b", "0"]);
        assert!(SortConfig::from_cli(&args).is_err());
    }

    #[test]
    fn test_validate_missing_source() {
        let dst = TempDir::new().unwrap();
        let config = SortConfig {
            source: PathBuf::from("/definitely/not/here"),
            output: dst.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SortCopyError::NotFound(_))
        ));
    }

    #[test]
    fn test_validate_source_not_a_directory() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let file = src.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        let config = SortConfig {
            source: file,
            output: dst.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SortCopyError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_validate_creates_output() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let output = dst.path().join("made/by/validate");

        let config = SortConfig {
            source: src.path().to_path_buf(),
            output: output.clone(),
            ..Default::default()
        };
        config.validate().unwrap();
        assert!(output.is_dir());
    }

    #[test]
    fn test_validate_rejects_output_inside_source() {
        let src = TempDir::new().unwrap();
        let config = SortConfig {
            source: src.path().to_path_buf(),
            output: src.path().join("sorted"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SortCopyError::OutputInsideSource(_))
        ));
    }
}
