//! Validation of package manifests.
//!
//! Only the root package is validated: it is the one that gets compiled, so it
//! must name distinct entry and output files. Vendored packages are frequently
//! include-only libraries and are taken as they are.

use thiserror::Error;

use crate::manifest::Package;

/// Reason a manifest failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `entry` is empty
    #[error("package does not define an entry point")]
    MissingEntry,

    /// `output` is empty
    #[error("package does not define an output file")]
    MissingOutput,

    /// `entry` and `output` name the same file
    #[error("package entry and output point to the same file")]
    EntryEqualsOutput,

    /// A non-archive resource populates a field only archives may use
    #[error("resource '{resource}' is not an archive but specifies '{field}'")]
    ArchiveOnlyField {
        /// Name pattern of the offending resource
        resource: String,
        /// The archive-only field that was set
        field: &'static str,
    },
}

impl Package {
    /// Check that the package can be built.
    ///
    /// Checks run in order and the first failure is returned:
    ///
    /// 1. `entry` is non-empty
    /// 2. `output` is non-empty
    /// 3. `entry` and `output` differ
    /// 4. every resource respects the archive-only field rule
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawnpm::manifest::{Package, ValidationError};
    ///
    /// let mut package = Package::default();
    /// package.entry = "gamemode.pwn".to_string();
    /// assert_eq!(package.validate(), Err(ValidationError::MissingOutput));
    ///
    /// package.output = "gamemode.amx".to_string();
    /// assert!(package.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entry.is_empty() {
            return Err(ValidationError::MissingEntry);
        }

        if self.output.is_empty() {
            return Err(ValidationError::MissingOutput);
        }

        if self.entry == self.output {
            return Err(ValidationError::EntryEqualsOutput);
        }

        for resource in &self.resources {
            resource.validate()?;
        }

        Ok(())
    }
}
