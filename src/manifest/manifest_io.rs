//! Reading and writing manifest files.
//!
//! A package root holds either `pawn.json` or `pawn.yaml`. When both are present
//! the JSON file wins and a warning is logged. The format a manifest was read
//! from is recorded on the [`Package`] so that [`Package::save`] writes it back
//! the same way.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::PawnpmError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::manifest::{ManifestFormat, Package};
use crate::utils::fs::atomic_write;

/// Locate the manifest file in `dir`.
///
/// Returns the path and format, or `None` if the directory holds neither file.
#[must_use]
pub fn find_manifest(dir: &Path) -> Option<(PathBuf, ManifestFormat)> {
    let json = dir.join(ManifestFormat::Json.file_name());
    let yaml = dir.join(ManifestFormat::Yaml.file_name());

    match (json.is_file(), yaml.is_file()) {
        (true, true) => {
            warn!(
                "Both {} and {} exist in {}, using {}",
                ManifestFormat::Json.file_name(),
                ManifestFormat::Yaml.file_name(),
                dir.display(),
                ManifestFormat::Json.file_name()
            );
            Some((json, ManifestFormat::Json))
        }
        (true, false) => Some((json, ManifestFormat::Json)),
        (false, true) => Some((yaml, ManifestFormat::Yaml)),
        (false, false) => None,
    }
}

impl Package {
    /// Load the package whose manifest lives in `dir`.
    ///
    /// `local_path` is set to `dir` and `format` to the file that was found.
    /// The manifest is not validated here; the caller decides whether the
    /// package is one that must be buildable.
    ///
    /// # Errors
    ///
    /// - [`PawnpmError::ManifestNotFound`] if `dir` holds no manifest
    /// - [`PawnpmError::ManifestParseError`] if the file is not a valid manifest
    /// - a [`FileOperationError`](crate::core::FileOperationError) if it cannot be read
    pub fn load_from_dir(dir: &Path, is_root: bool) -> Result<Self> {
        let Some((path, format)) = find_manifest(dir) else {
            return Err(PawnpmError::ManifestNotFound {
                path: dir.display().to_string(),
            }
            .into());
        };

        let mut package = Self::load_file(&path, format)?;
        package.is_root = is_root;
        package.local_path = Some(dir.to_path_buf());
        Ok(package)
    }

    /// Like [`Self::load_from_dir`], but a missing manifest is `Ok(None)`.
    ///
    /// Vendored repositories without a manifest are plain include libraries,
    /// so absence is expected there.
    pub fn try_load_from_dir(dir: &Path) -> Result<Option<Self>> {
        if find_manifest(dir).is_none() {
            debug!("No manifest in {}", dir.display());
            return Ok(None);
        }
        Self::load_from_dir(dir, false).map(Some)
    }

    fn load_file(path: &Path, format: ManifestFormat) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_file_context(
            FileOperation::Read,
            path,
            "reading package manifest",
        )?;

        let parsed: std::result::Result<Self, String> = match format {
            ManifestFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };

        let mut package = parsed.map_err(|reason| PawnpmError::ManifestParseError {
            file: path.display().to_string(),
            reason,
        })?;
        package.format = format;

        debug!(
            "Loaded {} manifest {} ({} dependencies)",
            format,
            path.display(),
            package.dependencies.len()
        );

        Ok(package)
    }

    /// Write the manifest back to `local_path` in the format it was read from.
    ///
    /// Runtime-only fields are not written. Build and runtime sections are
    /// written back exactly as they were read.
    ///
    /// # Errors
    ///
    /// Fails if the package has no local path or the file cannot be written.
    pub fn save(&self) -> Result<PathBuf> {
        let dir = self.local_path.as_ref().ok_or_else(|| PawnpmError::NotALocalPackage {
            reason: format!("package {} has no local path to save to", self.identity_string()),
        })?;
        let path = dir.join(self.format.file_name());

        let content = match self.format {
            ManifestFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)
                    .context("Failed to serialize manifest to JSON")?;
                json.push('\n');
                json
            }
            ManifestFormat::Yaml => {
                serde_yaml::to_string(self).context("Failed to serialize manifest to YAML")?
            }
        };

        atomic_write(&path, content.as_bytes())
            .with_context(|| format!("Failed to save manifest {}", path.display()))?;

        debug!("Saved {} manifest to {}", self.format, path.display());
        Ok(path)
    }
}
