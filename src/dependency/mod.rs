//! Dependency identities and the reference-string grammar.
//!
//! Every dependency is addressed by four fields: the repository owner, the
//! repository name, an optional subpath holding the package sources inside the
//! repository, and an optional version (a tag name or commit SHA). In manifests
//! and on the command line they are written as a single reference string:
//!
//! ```text
//! owner/repository[:subpath][@version]
//!
//! pawn-lang/samp-stdlib
//! pawn-lang/samp-stdlib@0.3.7
//! Southclaws/pawn-requests:include@0.10.0
//! ```
//!
//! [`DependencyMeta`] is the parsed form and doubles as the resolution key: two
//! identities are the same dependency only when all four fields match exactly.
//! An empty version means "the default branch tip" and is a different key from
//! any explicit version.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::REGISTRY_HOST;
use crate::core::PawnpmError;

/// Allowed characters for owner and repository names.
static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("segment pattern is a valid regex")
});

/// Parsed identity of a package: owner, repository, subpath and version.
///
/// Serialized with the manifest keys `user`, `repo`, `path` and `version`;
/// empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyMeta {
    /// Owner of the repository on the hosting platform
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Repository name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,
    /// Subdirectory of the repository holding the sources, empty for the root
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    /// Tag or commit SHA, empty for the default branch tip
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "version_string"
    )]
    pub version: String,
}

/// Accepts `version: 1.0` and `"version": 2` as well as strings.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Version::deserialize(deserializer)? {
        Version::Text(text) => text,
        Version::Unsigned(n) => n.to_string(),
        Version::Signed(n) => n.to_string(),
        // Debug keeps the fractional part: `1.0` stays "1.0".
        Version::Float(n) => format!("{n:?}"),
        Version::Null(()) => String::new(),
    })
}

impl DependencyMeta {
    /// Parse a reference string.
    ///
    /// Parsing is pure: whitespace is rejected rather than trimmed, and every
    /// component supplied comes back exactly as written.
    ///
    /// # Errors
    ///
    /// [`PawnpmError::MalformedReference`] when the owner or repository is
    /// missing or invalid, when `:`/`@` are followed by nothing, or when the
    /// subpath contains empty or `..` segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use pawnpm::dependency::DependencyMeta;
    ///
    /// let meta = DependencyMeta::parse("Southclaws/pawn-requests:include@0.10.0").unwrap();
    /// assert_eq!(meta.user, "Southclaws");
    /// assert_eq!(meta.repo, "pawn-requests");
    /// assert_eq!(meta.path, "include");
    /// assert_eq!(meta.version, "0.10.0");
    /// ```
    pub fn parse(reference: &str) -> Result<Self, PawnpmError> {
        let malformed = |reason: &str| PawnpmError::MalformedReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if reference.is_empty() {
            return Err(malformed("reference is empty"));
        }
        if reference.chars().any(char::is_whitespace) {
            return Err(malformed("whitespace is not allowed"));
        }

        let (head, version) = match reference.split_once('@') {
            Some((_, "")) => return Err(malformed("version after '@' is empty")),
            Some((_, version)) if version.contains('@') => {
                return Err(malformed("only one '@version' is allowed"));
            }
            Some((_, version)) if version.contains(':') => {
                return Err(malformed("':subpath' must come before '@version'"));
            }
            Some((head, version)) => (head, version),
            None => (reference, ""),
        };

        let (base, path) = match head.split_once(':') {
            Some((_, "")) => return Err(malformed("subpath after ':' is empty")),
            Some((base, path)) => (base, path),
            None => (head, ""),
        };

        let mut segments = base.split('/');
        let user = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        if segments.next().is_some() {
            return Err(malformed("expected exactly owner/repository before ':' or '@'"));
        }
        if user.is_empty() {
            return Err(malformed("missing owner"));
        }
        if repo.is_empty() {
            return Err(malformed("missing repository"));
        }
        check_name(user).map_err(|reason| malformed(&format!("owner {reason}")))?;
        check_name(repo).map_err(|reason| malformed(&format!("repository {reason}")))?;

        if !path.is_empty() {
            for segment in path.split('/') {
                if segment.is_empty() {
                    return Err(malformed("subpath contains an empty segment"));
                }
                if segment == ".." {
                    return Err(malformed("subpath may not contain '..'"));
                }
            }
        }

        Ok(Self {
            user: user.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
            version: version.to_string(),
        })
    }

    /// `owner/repository`, the part of the identity that selects a vendor directory.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.user, self.repo)
    }

    /// Directory this dependency is checked out into under `vendor_dir`.
    ///
    /// Subpath and version are not part of the path: one directory holds one
    /// checkout of the repository at a time.
    #[must_use]
    pub fn vendor_location(&self, vendor_dir: &Path) -> PathBuf {
        vendor_dir.join(&self.user).join(&self.repo)
    }

    /// Canonical web URL of the repository. Pure formatting, no network access.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        format!("https://{REGISTRY_HOST}/{}/{}", self.user, self.repo)
    }

    /// Clone URL of the repository under a registry base URL.
    #[must_use]
    pub fn url_with_base(&self, base: &str) -> String {
        format!("{}/{}/{}", base.trim_end_matches('/'), self.user, self.repo)
    }
}

/// Owner/repository names: registry-safe characters, never a relative path.
fn check_name(name: &str) -> Result<(), &'static str> {
    if name == "." || name == ".." {
        return Err("may not be '.' or '..'");
    }
    if !SEGMENT_RE.is_match(name) {
        return Err("may only contain letters, digits, '.', '_' and '-'");
    }
    Ok(())
}

impl FromStr for DependencyMeta {
    type Err = PawnpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DependencyMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.repo)?;
        if !self.path.is_empty() {
            write!(f, ":{}", self.path)?;
        }
        if !self.version.is_empty() {
            write!(f, "@{}", self.version)?;
        }
        Ok(())
    }
}

/// Unparsed dependency reference as written in a manifest's `dependencies` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyString(String);

impl DependencyString {
    /// Wrap a reference without parsing it.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Parse the reference into its identity.
    pub fn explode(&self) -> Result<DependencyMeta, PawnpmError> {
        DependencyMeta::parse(&self.0)
    }

    /// The reference exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DependencyString {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

impl From<&DependencyMeta> for DependencyString {
    fn from(meta: &DependencyMeta) -> Self {
        Self(meta.to_string())
    }
}

/// The concrete revision a fetch checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Full commit SHA of the checkout
    pub commit: String,
    /// Tag that matched the requested version, when the version was a tag
    pub tag: Option<String>,
}

impl fmt::Display for ResolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.commit.get(..12).unwrap_or(&self.commit);
        match &self.tag {
            Some(tag) => write!(f, "{tag} ({short})"),
            None => write!(f, "{short}"),
        }
    }
}

/// One entry of a root package's resolved dependency closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Identity as declared by the manifest that required it
    pub meta: DependencyMeta,
    /// Revision actually checked out for it
    pub reference: ResolvedRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(user: &str, repo: &str, path: &str, version: &str) -> DependencyMeta {
        DependencyMeta {
            user: user.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_parse_recovers_supplied_components() {
        let cases = [
            ("owner/repo", meta("owner", "repo", "", "")),
            ("owner/repo:path", meta("owner", "repo", "path", "")),
            ("owner/repo@v1.0", meta("owner", "repo", "", "v1.0")),
            ("owner/repo:path@v1.0", meta("owner", "repo", "path", "v1.0")),
            (
                "Southclaws/samp-plugin:include/pawn@1a2b3c4",
                meta("Southclaws", "samp-plugin", "include/pawn", "1a2b3c4"),
            ),
        ];

        for (reference, expected) in cases {
            let parsed = DependencyMeta::parse(reference).unwrap();
            assert_eq!(parsed, expected, "parsing {reference}");
            assert_eq!(parsed.to_string(), reference);
        }
    }

    #[test]
    fn test_parse_rejects_missing_owner_or_repository() {
        for reference in ["", "repo", "/repo", "owner/", "owner", ":path", "@v1", "/:x@y"] {
            let err = DependencyMeta::parse(reference).unwrap_err();
            assert!(
                matches!(err, PawnpmError::MalformedReference { .. }),
                "expected MalformedReference for {reference:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_path_traversal() {
        for reference in [
            "owner/repo:..",
            "owner/repo:../outside",
            "owner/repo:include/../../x@v1",
            "../repo",
            "owner/..",
        ] {
            assert!(DependencyMeta::parse(reference).is_err(), "{reference} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_whitespace_instead_of_trimming() {
        for reference in [" owner/repo", "owner/repo ", "owner/re po", "owner/repo@v1\n"] {
            let err = DependencyMeta::parse(reference).unwrap_err();
            assert!(err.to_string().contains("whitespace"), "{reference:?}: {err}");
        }
    }

    #[test]
    fn test_parse_rejects_empty_components() {
        assert!(DependencyMeta::parse("owner/repo@").is_err());
        assert!(DependencyMeta::parse("owner/repo:").is_err());
        assert!(DependencyMeta::parse("owner/repo:a//b").is_err());
        assert!(DependencyMeta::parse("owner/repo:/abs").is_err());
        assert!(DependencyMeta::parse("owner/repo/extra").is_err());
        assert!(DependencyMeta::parse("owner/repo@v1@v2").is_err());
        assert!(DependencyMeta::parse("owner/repo@v1:path").is_err());
    }

    #[test]
    fn test_error_names_the_reference() {
        let err = DependencyMeta::parse("owner/repo:..").unwrap_err();
        assert!(err.to_string().contains("'owner/repo:..'"));
    }

    #[test]
    fn test_version_is_not_normalized() {
        let unpinned = DependencyMeta::parse("owner/repo").unwrap();
        let pinned = DependencyMeta::parse("owner/repo@master").unwrap();
        assert_ne!(unpinned, pinned);

        let mut keys = std::collections::HashSet::new();
        keys.insert(unpinned);
        keys.insert(pinned);
        keys.insert(DependencyMeta::parse("owner/repo").unwrap());
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_locations_and_urls() {
        let dep = meta("pawn-lang", "samp-stdlib", "include/a_samp", "0.3.7");
        let vendor = Path::new("/work/gm/dependencies");

        assert_eq!(dep.vendor_location(vendor), vendor.join("pawn-lang").join("samp-stdlib"));
        assert_eq!(dep.canonical_url(), "https://github.com/pawn-lang/samp-stdlib");
        assert_eq!(
            dep.url_with_base("file:///tmp/registry/"),
            "file:///tmp/registry/pawn-lang/samp-stdlib"
        );
        assert_eq!(dep.repository(), "pawn-lang/samp-stdlib");
    }

    #[test]
    fn test_dependency_string_is_transparent() {
        let deps: Vec<DependencyString> =
            serde_json::from_str(r#"["a/b", "c/d:inc@v2"]"#).unwrap();
        assert_eq!(deps[1].as_str(), "c/d:inc@v2");
        assert_eq!(deps[1].explode().unwrap().path, "inc");
        assert_eq!(serde_json::to_string(&deps).unwrap(), r#"["a/b","c/d:inc@v2"]"#);
    }

    #[test]
    fn test_resolved_ref_display() {
        let tagged = ResolvedRef {
            commit: "0123456789abcdef0123".to_string(),
            tag: Some("v1.2.0".to_string()),
        };
        assert_eq!(tagged.to_string(), "v1.2.0 (0123456789ab)");

        let bare = ResolvedRef {
            commit: "abc".to_string(),
            tag: None,
        };
        assert_eq!(bare.to_string(), "abc");
    }
}
