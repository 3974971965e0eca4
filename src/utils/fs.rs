//! File system helpers used when writing manifests and vendoring packages.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::file_error::{FileOperation, FileResultExt};

/// Ensures a directory exists, creating it and its parents if needed.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_file_context(
            FileOperation::CreateDir,
            path,
            "preparing directory",
        )?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path exists but is not a directory: {}",
            path.display()
        ));
    }

    Ok(())
}

/// Writes `content` to `path` through a temporary file and a rename.
///
/// A reader never observes a half-written file. Parent directories are
/// created as needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .with_file_context(FileOperation::Write, &temp_path, "staging file contents")?;

    fs::rename(&temp_path, path).with_file_context(
        FileOperation::Write,
        path,
        "replacing file with staged contents",
    )?;

    Ok(())
}

/// Removes a directory tree; a missing directory is not an error.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    if tokio::fs::metadata(path).await.is_ok() {
        tokio::fs::remove_dir_all(path).await.with_file_context(
            FileOperation::Remove,
            path,
            "clearing directory",
        )?;
    }
    Ok(())
}
