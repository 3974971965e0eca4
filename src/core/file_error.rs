//! File operation errors with context.
//!
//! A bare [`std::io::Error`] does not say which file was involved. Wrapping it
//! with [`FileResultExt::with_file_context`] keeps the path and what pawnpm
//! was doing with it, so a failure while vendoring still points at the file.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kinds of file system access pawnpm performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing or replacing a file
    Write,
    /// Creating a directory and its parents
    CreateDir,
    /// Removing a directory tree
    Remove,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::CreateDir => "create directory",
            Self::Remove => "remove",
        };
        f.write_str(verb)
    }
}

/// An I/O failure together with the path and purpose of the access.
#[derive(Error, Debug)]
#[error("Failed to {operation} {} while {purpose}", .path.display())]
pub struct FileOperationError {
    /// What was attempted
    pub operation: FileOperation,
    /// The path being accessed
    pub path: PathBuf,
    /// Why, phrased as an activity ("saving package manifest")
    pub purpose: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Hint for the user based on the kind of I/O failure.
    #[must_use]
    pub fn hint(&self) -> String {
        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                format!("{} does not exist", self.path.display())
            }
            std::io::ErrorKind::PermissionDenied => {
                format!("Check the permissions of {}", self.path.display())
            }
            std::io::ErrorKind::InvalidData => {
                format!("{} is not valid UTF-8 text", self.path.display())
            }
            _ => self.source.to_string(),
        }
    }
}

/// Attach file context to I/O results.
pub trait FileResultExt<T> {
    /// Wrap an I/O error with the operation, path and purpose.
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl AsRef<Path>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl AsRef<Path>,
        purpose: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|source| FileOperationError {
            operation,
            path: path.as_ref().to_path_buf(),
            purpose: purpose.into(),
            source,
        })
    }
}
