//! Error handling for pawnpm
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`PawnpmError`]) so callers can match on failure modes
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and suggestions for the CLI
//!
//! Library code returns [`anyhow::Result`] and attaches context with
//! [`anyhow::Context`] as errors unwind, so the final error names the dependency
//! (and every parent dependency) that led to the failure. [`user_friendly_error`]
//! digs the typed error back out of that chain for display.
//!
//! # Error Categories
//!
//! - **References**: [`PawnpmError::MalformedReference`]
//! - **Manifests**: [`PawnpmError::ManifestNotFound`], [`PawnpmError::ManifestParseError`],
//!   [`PawnpmError::ManifestValidationError`]
//! - **Resolution**: [`PawnpmError::NotALocalPackage`], [`PawnpmError::FetchFailed`],
//!   [`PawnpmError::VersionConflict`], [`PawnpmError::VersionNotFound`]
//! - **Git**: [`PawnpmError::GitNotFound`], [`PawnpmError::GitCommandError`],
//!   [`PawnpmError::GitCloneFailed`], [`PawnpmError::GitCheckoutFailed`]
//! - **File system**: [`PawnpmError::FileSystemError`], [`PawnpmError::PermissionDenied`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use pawnpm::core::{PawnpmError, user_friendly_error};
//!
//! let error = PawnpmError::MalformedReference {
//!     reference: "pawn-lang".to_string(),
//!     reason: "expected owner/repository".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::core::file_error::FileOperationError;

/// The main error type for pawnpm operations.
///
/// Each variant carries the strings needed to explain the failure on its own, so
/// the enum stays cheap to clone for [`user_friendly_error`].
#[derive(Error, Debug, Clone)]
pub enum PawnpmError {
    /// A dependency reference string does not follow `owner/repository[:subpath][@version]`
    #[error("Malformed dependency reference '{reference}': {reason}")]
    MalformedReference {
        /// The reference exactly as written in the manifest or on the command line
        reference: String,
        /// What part of the grammar was violated
        reason: String,
    },

    /// Resolution was requested for a package that has no directory on disk
    #[error("Package does not represent a locally stored package: {reason}")]
    NotALocalPackage {
        /// Why the package was rejected
        reason: String,
    },

    /// The fetch-and-checkout step failed for a dependency
    #[error("Failed to ensure package {dependency}: {reason}")]
    FetchFailed {
        /// Display string of the dependency identity
        dependency: String,
        /// Underlying failure, including its cause chain
        reason: String,
    },

    /// Two pinned versions of the same repository were requested in one resolution
    #[error(
        "Version conflict for {repository}: '{existing}' is already checked out but '{requested}' was requested"
    )]
    VersionConflict {
        /// `owner/repository` of the shared vendor directory
        repository: String,
        /// Version that was checked out first
        existing: String,
        /// Version requested afterwards
        requested: String,
    },

    /// A pinned version is neither a tag nor a commit of the repository
    #[error("Version '{version}' not found for dependency '{dependency}'")]
    VersionNotFound {
        /// Display string of the dependency identity
        dependency: String,
        /// The tag or commit that could not be found
        version: String,
    },

    /// No `pawn.json` or `pawn.yaml` in the package directory
    #[error("No package manifest (pawn.json or pawn.yaml) found in {path}")]
    ManifestNotFound {
        /// Directory that was searched
        path: String,
    },

    /// Manifest parsing error
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Manifest validation error
    #[error("Manifest validation failed: {reason}")]
    ManifestValidationError {
        /// Reason why manifest validation failed
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Git executable not found in PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Git operation failed during execution
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g., "clone", "fetch", "checkout")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// Git repository clone failed
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// The repository URL that failed to clone
        url: String,
        /// The reason for the clone failure
        reason: String,
    },

    /// Git checkout failed
    #[error("Failed to checkout reference '{reference}' in repository")]
    GitCheckoutFailed {
        /// The git reference (tag or commit) that failed to checkout
        reference: String,
        /// The reason for the checkout failure
        reason: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was denied due to insufficient permissions
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error wrapper carrying a user-facing suggestion and details.
///
/// Built by [`user_friendly_error`] and printed by [`ErrorContext::display`] in
/// the CLI's top-level error handler.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying pawnpm error
    pub error: PawnpmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PawnpmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, displayed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, displayed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Typed [`PawnpmError`]s anywhere in the chain get tailored suggestions. The
/// surrounding context messages (which name the dependencies being resolved) are
/// kept in the details so the user sees where in the tree the failure happened.
///
/// # Examples
///
/// ```rust,no_run
/// use pawnpm::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
/// context.display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(pawnpm_error) = error.downcast_ref::<PawnpmError>() {
        let mut ctx = create_error_context(pawnpm_error.clone());
        let trail = context_trail(&error);
        if !trail.is_empty() {
            let details = match ctx.details.take() {
                Some(details) => format!("{details}\n\nWhile:\n{trail}"),
                None => format!("While:\n{trail}"),
            };
            ctx.details = Some(details);
        }
        return ctx;
    }

    if let Some(file_error) = error.downcast_ref::<FileOperationError>() {
        return ErrorContext::new(PawnpmError::FileSystemError {
            operation: file_error.to_string(),
            path: file_error.path.display().to_string(),
        })
        .with_suggestion(file_error.hint())
        .with_details(format!("{error:#}"));
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PawnpmError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the package directory")
                .with_details(
                    "This error occurs when pawnpm doesn't have permission to read or write files",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PawnpmError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PawnpmError::Other {
        message,
    })
}

/// Context messages layered above the typed error, outermost first.
fn context_trail(error: &anyhow::Error) -> String {
    error
        .chain()
        .take_while(|cause| cause.downcast_ref::<PawnpmError>().is_none())
        .map(|cause| format!("  - {cause}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn create_error_context(error: PawnpmError) -> ErrorContext {
    let (suggestion, details) = guidance(&error);
    let mut ctx = ErrorContext::new(error);
    ctx.suggestion = suggestion;
    ctx.details = details;
    ctx
}

/// Suggestion and details tailored to each error variant.
fn guidance(error: &PawnpmError) -> (Option<String>, Option<String>) {
    match error {
        PawnpmError::MalformedReference { .. } => (
            Some("Write dependencies as owner/repository, optionally followed by :subpath and @version (e.g. pawn-lang/samp-stdlib@0.3.7)".to_string()),
            Some("References may not contain whitespace, empty path segments or '..'".to_string()),
        ),

        PawnpmError::NotALocalPackage { .. } => (
            Some("Run the command from a package directory or pass --dir <path>".to_string()),
            None,
        ),

        PawnpmError::FetchFailed { dependency, .. } => (
            Some(format!(
                "Check that {dependency} exists and is reachable, then re-run. Dependencies that were already fetched are not downloaded again"
            )),
            Some("Resolution stops at the first dependency that cannot be fetched".to_string()),
        ),

        PawnpmError::VersionConflict { repository, .. } => (
            Some(format!("Pin every reference to {repository} to the same version in your manifests")),
            Some("The dependencies directory holds exactly one checkout per repository".to_string()),
        ),

        PawnpmError::VersionNotFound { version, .. } => (
            Some("List the available tags with 'git tag -l' in the dependency's directory, or drop the @version to track the default branch".to_string()),
            Some(format!("'{version}' doesn't exist as a git tag or commit in the repository")),
        ),

        PawnpmError::ManifestNotFound { .. } => (
            Some("Create a pawn.json or pawn.yaml file in the package directory".to_string()),
            None,
        ),

        PawnpmError::ManifestParseError { file, .. } => (
            Some(format!(
                "Check the syntax of {file}. Common issues: trailing commas, unmatched brackets, wrong indentation"
            )),
            None,
        ),

        PawnpmError::ManifestValidationError { .. } => (
            Some("Set both 'entry' and 'output' in the manifest, to different files".to_string()),
            None,
        ),

        PawnpmError::GitNotFound => (
            Some("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')".to_string()),
            Some("pawnpm requires git to be installed and available in your PATH to fetch dependencies".to_string()),
        ),

        PawnpmError::GitCloneFailed { url, .. } => (
            Some(format!(
                "Verify the repository URL is correct: {url}. Check your internet connection and repository access"
            )),
            Some("Clone operations can fail due to invalid URLs, network issues, or access restrictions".to_string()),
        ),

        PawnpmError::GitCommandError { operation, .. } => {
            let suggestion = match operation.as_str() {
                op if op.contains("fetch") => "Check your internet connection and repository access. Try 'git fetch' manually in the dependency's directory",
                op if op.contains("checkout") => "Verify the tag or commit exists. Use 'git tag -l' to list available references",
                _ => "Check your git configuration and repository access. Try running the git command manually for more details",
            };
            (Some(suggestion.to_string()), None)
        }

        PawnpmError::PermissionDenied { operation, path } => (
            Some(match cfg!(windows) {
                true => "Run as Administrator or check file permissions in File Explorer".to_string(),
                false => "Use 'sudo' or check file permissions with 'ls -la'".to_string(),
            }),
            Some(format!("Cannot {operation} due to insufficient permissions on {path}")),
        ),

        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = PawnpmError::GitNotFound;
        assert_eq!(error.to_string(), "Git is not installed or not found in PATH");

        let error = PawnpmError::FetchFailed {
            dependency: "pawn-lang/samp-stdlib@0.3.7".to_string(),
            reason: "network unreachable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to ensure package pawn-lang/samp-stdlib@0.3.7: network unreachable"
        );

        let error = PawnpmError::VersionConflict {
            repository: "a/b".to_string(),
            existing: "v1".to_string(),
            requested: "v2".to_string(),
        };
        assert!(error.to_string().contains("a/b"));
        assert!(error.to_string().contains("'v1'"));
        assert!(error.to_string().contains("'v2'"));
    }

    #[test]
    fn test_error_context() {
        let ctx = ErrorContext::new(PawnpmError::GitNotFound)
            .with_suggestion("Install git using your package manager")
            .with_details("Git is required");

        assert_eq!(ctx.suggestion, Some("Install git using your package manager".to_string()));
        assert_eq!(ctx.details, Some("Git is required".to_string()));

        let display = format!("{ctx}");
        assert!(display.contains("Git is not installed or not found in PATH"));
        assert!(display.contains("Install git"));
    }

    #[test]
    fn test_user_friendly_error_keeps_context_trail() {
        let error: anyhow::Result<()> = Err(PawnpmError::FetchFailed {
            dependency: "owner/leaf".to_string(),
            reason: "boom".to_string(),
        }
        .into());
        let error = error
            .context("while resolving dependencies of owner/middle")
            .context("while resolving dependencies of owner/top")
            .unwrap_err();

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, PawnpmError::FetchFailed { .. }));
        let details = ctx.details.unwrap();
        assert!(details.contains("owner/middle"));
        assert!(details.contains("owner/top"));
        assert!(ctx.suggestion.unwrap().contains("owner/leaf"));
    }

    #[test]
    fn test_user_friendly_error_permission_denied() {
        use std::io::{Error, ErrorKind};

        let io_error = Error::new(ErrorKind::PermissionDenied, "access denied");
        let ctx = user_friendly_error(anyhow::Error::from(io_error));
        assert!(matches!(ctx.error, PawnpmError::PermissionDenied { .. }));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.details.is_some());
    }

    #[test]
    fn test_user_friendly_error_file_operation() {
        use crate::core::file_error::{FileOperation, FileResultExt};

        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let error = result
            .with_file_context(FileOperation::Read, "gm/pawn.json", "reading package manifest")
            .unwrap_err();

        let ctx = user_friendly_error(anyhow::Error::from(error));
        match &ctx.error {
            PawnpmError::FileSystemError {
                operation,
                path,
            } => {
                assert!(operation.contains("reading package manifest"));
                assert_eq!(path, "gm/pawn.json");
            }
            other => panic!("Expected FileSystemError, got {other:?}"),
        }
        assert_eq!(ctx.suggestion.as_deref(), Some("gm/pawn.json does not exist"));
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let error = anyhow::anyhow!("root cause").context("outer step");
        let ctx = user_friendly_error(error);
        match ctx.error {
            PawnpmError::Other {
                message,
            } => {
                assert!(message.contains("outer step"));
                assert!(message.contains("root cause"));
            }
            _ => panic!("Expected Other error"),
        }
    }
}
