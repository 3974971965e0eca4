//! Cross-process advisory locks for vendor directories.
//!
//! Two `pawnpm` processes vendoring into the same project must not clone into
//! or check out the same directory at the same time. Each destination gets a
//! lock file under `<vendor_dir>/.locks/`; the lock is released when the
//! [`VendorLock`] is dropped.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::constants::LOCKS_DIR_NAME;

/// Exclusive file lock on one vendored repository.
#[derive(Debug)]
pub struct VendorLock {
    file: File,
    path: PathBuf,
}

impl VendorLock {
    /// Block until the lock named `name` under `vendor_dir` is held.
    ///
    /// The blocking lock call runs on tokio's blocking pool.
    pub async fn acquire(vendor_dir: &Path, name: &str) -> Result<Self> {
        let locks_dir = vendor_dir.join(LOCKS_DIR_NAME);
        tokio::fs::create_dir_all(&locks_dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                anyhow::anyhow!(
                    "Permission denied: cannot create locks directory at {}",
                    locks_dir.display()
                )
            } else {
                anyhow::anyhow!("Failed to create directory {}: {}", locks_dir.display(), e)
            }
        })?;

        let lock_path = locks_dir.join(format!("{name}.lock"));
        let blocking_path = lock_path.clone();
        let name = name.to_string();

        let file = tokio::task::spawn_blocking(move || -> Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&blocking_path)
                .with_context(|| format!("Failed to open lock file: {}", blocking_path.display()))?;

            FileExt::lock_exclusive(&file).with_context(|| format!("Failed to acquire lock for: {name}"))?;

            Ok(file)
        })
        .await
        .context("Failed to spawn blocking task for lock acquisition")??;

        tracing::trace!(target: "pawnpm::fetch", "Acquired lock {}", lock_path.display());

        Ok(Self {
            file,
            path: lock_path,
        })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for VendorLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(target: "pawnpm::fetch", "Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lock_file_location() {
        let temp = TempDir::new().unwrap();
        let lock = VendorLock::acquire(temp.path(), "acme@lib").await.unwrap();

        assert_eq!(lock.path(), temp.path().join(".locks").join("acme@lib.lock"));
        assert!(lock.path().exists());
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();
        let holders = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let dir = dir.clone();
            let holders = Arc::clone(&holders);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _lock = VendorLock::acquire(&dir, "shared").await.unwrap();
                let now = holders.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                holders.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lock_released_on_drop() {
        let temp = TempDir::new().unwrap();
        {
            let _lock = VendorLock::acquire(temp.path(), "again").await.unwrap();
        }
        let reacquired = tokio::time::timeout(
            Duration::from_secs(5),
            VendorLock::acquire(temp.path(), "again"),
        )
        .await;
        assert!(reacquired.is_ok());
    }
}
