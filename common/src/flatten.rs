//! Identity flattening for `aar` artifacts.
//!
//! An `aar` coordinate is republished as a `jar` under an optional namespace
//! prefix (the "shadow group"). Every other packaging passes through
//! untouched, so flattening is idempotent outside `aar`.

use crate::coordinate::{ArtifactCoordinate, DEFAULT_PACKAGING};

/// Packaging that triggers flattening.
pub const FLATTENED_PACKAGING: &str = "aar";

/// A normalised namespace prefix.
///
/// Blank prefixes normalise to the empty string; non-empty prefixes always
/// end with exactly the dot the caller supplied or a single appended one.
///
/// # Examples
///
/// ```
/// use unaar_common::NamespacePrefix;
///
/// assert_eq!(NamespacePrefix::normalise(Some(" shadow ")).as_str(), "shadow.");
/// assert_eq!(NamespacePrefix::normalise(Some("shadow.")).as_str(), "shadow.");
/// assert_eq!(NamespacePrefix::normalise(None).as_str(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    /// Normalise a raw prefix.
    #[must_use]
    pub fn normalise(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() || trimmed.ends_with('.') {
            Self(trimmed.to_owned())
        } else {
            Self(format!("{trimmed}."))
        }
    }

    /// The normalised prefix, possibly empty.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no namespace rewrite applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute the installable identity for `coord`.
///
/// # Examples
///
/// ```
/// use unaar_common::{ArtifactCoordinate, flatten};
///
/// let aar = ArtifactCoordinate::new("com.example", "foo", "aar", "2.1");
/// let flat = flatten(&aar, Some("acme"));
/// assert_eq!(flat, ArtifactCoordinate::new("acme.com.example", "foo", "jar", "2.1"));
///
/// let jar = ArtifactCoordinate::new("com.example", "bar", "jar", "1.0");
/// assert_eq!(flatten(&jar, Some("acme")), jar);
/// ```
#[must_use]
pub fn flatten(coord: &ArtifactCoordinate, prefix: Option<&str>) -> ArtifactCoordinate {
    if coord.packaging() != FLATTENED_PACKAGING {
        return coord.clone();
    }
    let prefix = NamespacePrefix::normalise(prefix);
    coord.with_namespace_and_packaging(
        format!("{}{}", prefix.as_str(), coord.namespace()),
        DEFAULT_PACKAGING,
    )
}
