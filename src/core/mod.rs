//! Core error types for pawnpm
//!
//! - [`PawnpmError`] - typed failures shared by every module
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI-facing rendering with suggestions
//! - [`file_error`] - I/O failures annotated with the file and purpose

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, PawnpmError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
