//! Per-file copy task
//!
//! Each file discovered by the walker becomes one `copy_file` call: derive
//! the extension bucket, make sure the bucket directory exists, then stream
//! the bytes across in fixed-size chunks. The copy yields at every chunk
//! read and write, so other in-flight copies progress while this one waits
//! on I/O.

use crate::error::{IoResultExt, Result, SortCopyError};
use crate::progress::Reporter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Bucket name for files without an extension
pub const NO_EXT_BUCKET: &str = "no_ext";

/// Map a file path to its extension bucket: the lower-cased extension
/// without the leading dot, or [`NO_EXT_BUCKET`] when there is none.
pub fn bucket_name(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
        _ => NO_EXT_BUCKET.to_string(),
    }
}

/// Copies single files into extension buckets under a destination root
pub struct Copier {
    /// Destination root the buckets live under
    dest_root: PathBuf,
    /// Chunk size for streaming copies
    buffer_size: usize,
    /// Outcome sink
    reporter: Arc<Reporter>,
}

impl Copier {
    /// Create a new copier writing buckets under `dest_root`
    pub fn new(dest_root: PathBuf, buffer_size: usize, reporter: Arc<Reporter>) -> Self {
        Self {
            dest_root,
            buffer_size,
            reporter,
        }
    }

    /// Copy one file into its extension bucket.
    ///
    /// This is the task's error boundary: every failure is reported
    /// through the [`Reporter`] and terminal for this file only, so a
    /// bad file never takes down sibling copies or the traversal.
    pub async fn copy_file(&self, source: &Path) {
        match self.try_copy(source).await {
            Ok((dest, bytes)) => self.reporter.copy_succeeded(source, &dest, bytes),
            Err(err) => self.reporter.copy_failed(source, &err),
        }
    }

    async fn try_copy(&self, source: &Path) -> Result<(PathBuf, u64)> {
        let bucket = bucket_name(source);
        let bucket_dir = self.ensure_bucket(&bucket).await?;

        let file_name = source
            .file_name()
            .ok_or_else(|| SortCopyError::InvalidPath(source.display().to_string()))?;
        let dest = bucket_dir.join(file_name);

        let bytes = self.stream_copy(source, &dest).await?;
        Ok((dest, bytes))
    }

    /// Ensure the bucket directory exists (idempotent ensure).
    ///
    /// Concurrent first-creators race for the same extension; the loser's
    /// `AlreadyExists` is success, not an error.
    async fn ensure_bucket(&self, bucket: &str) -> Result<PathBuf> {
        let dir = self.dest_root.join(bucket);
        match fs::create_dir(&dir).await {
            Ok(()) => Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(dir),
            Err(e) => Err(SortCopyError::io(&dir, e)),
        }
    }

    /// Stream `source` to `dest` in fixed-size chunks.
    ///
    /// An existing destination file is truncated and overwritten; with
    /// same-named sources in different subdirectories the later-completing
    /// copy wins.
    async fn stream_copy(&self, source: &Path, dest: &Path) -> Result<u64> {
        let mut reader = fs::File::open(source).await.with_path(source)?;
        let mut writer = fs::File::create(dest).await.with_path(dest)?;

        let mut buf = vec![0u8; self.buffer_size];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buf).await.with_path(source)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await.with_path(dest)?;
            total += n as u64;
        }
        writer.flush().await.with_path(dest)?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BUFFER_SIZE;
    use tempfile::TempDir;

    fn test_copier(dest: &Path) -> (Copier, Arc<Reporter>) {
        let reporter = Arc::new(Reporter::new());
        let copier = Copier::new(
            dest.to_path_buf(),
            DEFAULT_BUFFER_SIZE,
            Arc::clone(&reporter),
        );
        (copier, reporter)
    }

    #[test]
    fn test_bucket_name() {
        assert_eq!(bucket_name(Path::new("/a/report.txt")), "txt");
        assert_eq!(bucket_name(Path::new("/a/PHOTO.JPG")), "jpg");
        assert_eq!(bucket_name(Path::new("/a/archive.tar.gz")), "gz");
        assert_eq!(bucket_name(Path::new("/a/README")), NO_EXT_BUCKET);
        assert_eq!(bucket_name(Path::new("/a/.bashrc")), NO_EXT_BUCKET);
        assert_eq!(bucket_name(Path::new("/a/trailing.")), NO_EXT_BUCKET);
    }

    #[tokio::test]
    async fn test_copy_creates_bucket_and_file() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let file = src.path().join("notes.Md");
        std::fs::write(&file, b"hello").unwrap();

        let (copier, reporter) = test_copier(dst.path());
        copier.copy_file(&file).await;

        assert_eq!(reporter.files_copied(), 1);
        assert_eq!(reporter.files_failed(), 0);
        let copied = dst.path().join("md/notes.Md");
        assert_eq!(std::fs::read(copied).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_chunk_boundary_sizes() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let (copier, reporter) = test_copier(dst.path());

        // 0 bytes, 1 byte, exactly one chunk, one chunk plus one byte
        let sizes = [0usize, 1, DEFAULT_BUFFER_SIZE, DEFAULT_BUFFER_SIZE + 1];
        for (i, size) in sizes.iter().enumerate() {
            let content: Vec<u8> = (0..*size).map(|b| (b % 251) as u8).collect();
            let file = src.path().join(format!("f{}.bin", i));
            std::fs::write(&file, &content).unwrap();

            copier.copy_file(&file).await;

            let copied = dst.path().join("bin").join(format!("f{}.bin", i));
            assert_eq!(std::fs::read(copied).unwrap(), content, "size {}", size);
        }
        assert_eq!(reporter.files_copied(), sizes.len() as u64);
    }

    #[tokio::test]
    async fn test_ensure_bucket_idempotent() {
        let dst = TempDir::new().unwrap();
        let (copier, _) = test_copier(dst.path());

        let first = copier.ensure_bucket("txt").await.unwrap();
        let second = copier.ensure_bucket("txt").await.unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[tokio::test]
    async fn test_same_name_overwrites() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir(src.path().join("sub")).unwrap();
        let first = src.path().join("dup.txt");
        let second = src.path().join("sub/dup.txt");
        std::fs::write(&first, b"first").unwrap();
        std::fs::write(&second, b"second wins").unwrap();

        let (copier, _) = test_copier(dst.path());
        copier.copy_file(&first).await;
        copier.copy_file(&second).await;

        let copied = dst.path().join("txt/dup.txt");
        assert_eq!(std::fs::read(copied).unwrap(), b"second wins");
    }

    #[test]
    fn test_missing_source_is_logged_not_fatal() {
        let dst = TempDir::new().unwrap();
        let (copier, reporter) = test_copier(dst.path());

        tokio_test::block_on(copier.copy_file(Path::new("/no/such/file.txt")));

        assert_eq!(reporter.files_copied(), 0);
        assert_eq!(reporter.files_failed(), 1);
    }
}
