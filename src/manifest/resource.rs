//! Platform-specific auxiliary resources.
//!
//! Packages that ship native plugins publish them as release assets, one per
//! platform. A [`Resource`] describes one such asset: a file name pattern, the
//! platform it targets, and for archives which parts of the archive hold
//! include directories, plugin binaries and other files.
//!
//! Selection is by exact, case-sensitive platform name. A resource with an
//! empty platform applies everywhere.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::manifest::ValidationError;

/// An auxiliary resource a package needs at build or run time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// File name pattern of the asset
    #[serde(default)]
    pub name: String,

    /// Target platform; empty means every platform
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,

    /// Whether the asset is an archive rather than a single file
    #[serde(default, alias = "release", skip_serializing_if = "std::ops::Not::not")]
    pub archive: bool,

    /// Archive only: directories containing `.inc` files for the compiler
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    /// Archive only: paths to plugin binaries (`.so` / `.dll`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Archive only: archive path to extraction path, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub files: IndexMap<String, String>,
}

impl Resource {
    /// Whether this resource is used on `platform`.
    #[must_use]
    pub fn applies_to(&self, platform: &str) -> bool {
        self.platform.is_empty() || self.platform == platform
    }

    /// Reject archive-only fields on single-file resources.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ArchiveOnlyField`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.archive {
            return Ok(());
        }

        let field = if !self.includes.is_empty() {
            Some("includes")
        } else if !self.plugins.is_empty() {
            Some("plugins")
        } else if !self.files.is_empty() {
            Some("files")
        } else {
            None
        };

        match field {
            Some(field) => Err(ValidationError::ArchiveOnlyField {
                resource: self.name.clone(),
                field,
            }),
            None => Ok(()),
        }
    }
}

/// Resources applicable to `platform`, order preserved.
///
/// # Examples
///
/// ```rust
/// use pawnpm::manifest::{Resource, applicable_resources};
///
/// let resources = vec![
///     Resource { name: "any".into(), ..Resource::default() },
///     Resource { name: "win".into(), platform: "windows".into(), ..Resource::default() },
///     Resource { name: "lin".into(), platform: "linux".into(), ..Resource::default() },
/// ];
///
/// let names: Vec<_> = applicable_resources(&resources, "linux")
///     .into_iter()
///     .map(|r| r.name.as_str())
///     .collect();
/// assert_eq!(names, ["any", "lin"]);
/// ```
#[must_use]
pub fn applicable_resources<'a>(resources: &'a [Resource], platform: &str) -> Vec<&'a Resource> {
    resources.iter().filter(|resource| resource.applies_to(platform)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, platform: &str) -> Resource {
        Resource {
            name: name.to_string(),
            platform: platform.to_string(),
            ..Resource::default()
        }
    }

    #[test]
    fn test_filter_keeps_generic_and_matching() {
        let resources = vec![
            resource("A", ""),
            resource("B", "windows"),
            resource("C", "linux"),
        ];

        let linux: Vec<_> = applicable_resources(&resources, "linux")
            .into_iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(linux, vec!["A", "C"]);

        let windows: Vec<_> = applicable_resources(&resources, "windows")
            .into_iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(windows, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let resources = vec![resource("plugin", "Linux")];
        assert!(applicable_resources(&resources, "linux").is_empty());
    }

    #[test]
    fn test_unknown_platform_gets_only_generic() {
        let resources = vec![resource("A", ""), resource("B", "windows")];
        let selected = applicable_resources(&resources, "freebsd");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "A");
    }

    #[test]
    fn test_validate_rejects_archive_fields_on_single_file() {
        let mut plain = resource("plugin.so", "linux");
        plain.plugins.push("plugin.so".to_string());

        let err = plain.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::ArchiveOnlyField {
                resource: "plugin.so".to_string(),
                field: "plugins",
            }
        );

        plain.archive = true;
        assert!(plain.validate().is_ok());
    }

    #[test]
    fn test_files_keep_declaration_order() {
        let json = r#"{
            "name": "^bundle-(.*).zip$",
            "archive": true,
            "files": { "z/last.txt": "last.txt", "a/first.txt": "first.txt" }
        }"#;

        let resource: Resource = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = resource.files.keys().cloned().collect();
        assert_eq!(keys, vec!["z/last.txt", "a/first.txt"]);
    }

    #[test]
    fn test_release_is_accepted_for_archive() {
        let resource: Resource =
            serde_json::from_str(r#"{"name": "x.zip", "release": true}"#).unwrap();
        assert!(resource.archive);
    }
}
