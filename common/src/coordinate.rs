//! Artifact coordinates and their textual forms.
//!
//! A coordinate is written `namespace:name:version` or
//! `namespace:name:packaging:version`; lists of coordinates are separated by
//! `;`. The three-part form implies `jar` packaging.

use crate::error::{CoordinateError, Result};
use std::fmt;
use std::str::FromStr;

/// Separator between the fields of a single coordinate.
pub const FIELD_SEPARATOR: char = ':';

/// Separator between coordinates in a list.
pub const LIST_SEPARATOR: char = ';';

/// Packaging assumed when a coordinate omits it.
pub const DEFAULT_PACKAGING: &str = "jar";

/// File extension of generated descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "pom";

/// An immutable `(namespace, name, packaging, version)` tuple.
///
/// # Examples
///
/// ```
/// use unaar_common::ArtifactCoordinate;
///
/// let coord = ArtifactCoordinate::parse("com.example:foo:aar:2.1").expect("valid coordinate");
/// assert_eq!(coord.namespace(), "com.example");
/// assert_eq!(coord.packaging(), "aar");
/// assert_eq!(coord.archive_filename(), "foo-2.1.aar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    namespace: String,
    name: String,
    packaging: String,
    version: String,
}

impl ArtifactCoordinate {
    /// Create a coordinate from its four fields.
    ///
    /// No validation is performed; use [`Self::parse`] for untrusted input.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        packaging: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            packaging: packaging.into(),
            version: version.into(),
        }
    }

    /// Parse a single coordinate token.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::MalformedCoordinate`] when the token does
    /// not split into three or four parts, or when any part is empty.
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split(FIELD_SEPARATOR).collect();
        let coord = match parts.as_slice() {
            [namespace, name, version] => Self::new(*namespace, *name, DEFAULT_PACKAGING, *version),
            [namespace, name, packaging, version] => {
                Self::new(*namespace, *name, *packaging, *version)
            }
            other => {
                return Err(malformed(
                    token,
                    format!("expected 3 or 4 parts, found {}", other.len()),
                ));
            }
        };

        if parts.iter().any(|part| part.is_empty()) {
            return Err(malformed(token, "empty field".to_owned()));
        }
        Ok(coord)
    }

    /// The dot-separated group.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The artifact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The packaging type, such as `jar` or `aar`.
    #[must_use]
    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    /// The version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns a copy with a different namespace and packaging.
    #[must_use]
    pub fn with_namespace_and_packaging(
        &self,
        namespace: impl Into<String>,
        packaging: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: self.name.clone(),
            packaging: packaging.into(),
            version: self.version.clone(),
        }
    }

    /// `<name>-<version>.<packaging>`
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}-{}.{}", self.name, self.version, self.packaging)
    }

    /// `<name>-<version>.pom`
    #[must_use]
    pub fn descriptor_filename(&self) -> String {
        format!("{}-{}.{DESCRIPTOR_EXTENSION}", self.name, self.version)
    }

    /// Path of the archive relative to a Maven-layout repository root.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaar_common::ArtifactCoordinate;
    ///
    /// let coord = ArtifactCoordinate::new("com.example", "foo", "aar", "2.1");
    /// assert_eq!(coord.repository_path(), "com/example/foo/2.1/foo-2.1.aar");
    /// ```
    #[must_use]
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.namespace.replace('.', "/"),
            self.name,
            self.version,
            self.archive_filename()
        )
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Renders the token form, omitting `jar` packaging.
impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.packaging == DEFAULT_PACKAGING {
            write!(f, "{}:{}:{}", self.namespace, self.name, self.version)
        } else {
            write!(
                f,
                "{}:{}:{}:{}",
                self.namespace, self.name, self.packaging, self.version
            )
        }
    }
}

/// Parse a `;`-separated list of coordinate tokens, preserving input order.
///
/// Tokens are trimmed and blank tokens are skipped, so an empty string
/// yields an empty list.
///
/// # Errors
///
/// Returns the error for the first malformed token; nothing after it is
/// parsed.
///
/// # Examples
///
/// ```
/// use unaar_common::parse_coordinates;
///
/// let coords = parse_coordinates("g:a:1.0; g:b:aar:2.0;").expect("valid list");
/// assert_eq!(coords.len(), 2);
/// assert!(parse_coordinates("").expect("empty list").is_empty());
/// ```
pub fn parse_coordinates(list: &str) -> Result<Vec<ArtifactCoordinate>> {
    list.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ArtifactCoordinate::parse)
        .collect()
}

fn malformed(token: &str, reason: String) -> CoordinateError {
    CoordinateError::MalformedCoordinate {
        token: token.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn three_parts_default_to_jar() {
        let coord = ArtifactCoordinate::parse("g:a:1.0").expect("valid coordinate");
        assert_eq!(coord, ArtifactCoordinate::new("g", "a", "jar", "1.0"));
    }

    #[test]
    fn four_parts_carry_packaging() {
        let coord = ArtifactCoordinate::parse("g:a:aar:1.0").expect("valid coordinate");
        assert_eq!(coord, ArtifactCoordinate::new("g", "a", "aar", "1.0"));
    }

    #[rstest]
    #[case::too_few("g:a")]
    #[case::too_many("g:a:x:y:z")]
    #[case::single("g")]
    #[case::empty_version("g:a:")]
    #[case::empty_namespace(":a:1.0")]
    #[case::empty_packaging("g:a::1.0")]
    fn rejects_malformed_tokens(#[case] token: &str) {
        let err = ArtifactCoordinate::parse(token).expect_err("expected parse failure");
        assert!(matches!(
            err,
            CoordinateError::MalformedCoordinate { token: ref t, .. } if t == token
        ));
    }

    #[rstest]
    #[case::jar_omits_packaging("g:a:1.0", "g:a:1.0")]
    #[case::explicit_jar_is_shortened("g:a:jar:1.0", "g:a:1.0")]
    #[case::aar_keeps_packaging("g:a:aar:1.0", "g:a:aar:1.0")]
    fn display_uses_token_form(#[case] token: &str, #[case] expected: &str) {
        let coord = ArtifactCoordinate::parse(token).expect("valid coordinate");
        assert_eq!(coord.to_string(), expected);
    }

    #[test]
    fn derived_filenames() {
        let coord = ArtifactCoordinate::new("com.example", "foo", "jar", "2.1");
        assert_eq!(coord.archive_filename(), "foo-2.1.jar");
        assert_eq!(coord.descriptor_filename(), "foo-2.1.pom");
    }

    #[test]
    fn repository_path_replaces_every_dot() {
        let coord = ArtifactCoordinate::new("androidx.core.ktx", "core", "aar", "1.9.0");
        assert_eq!(
            coord.repository_path(),
            "androidx/core/ktx/core/1.9.0/core-1.9.0.aar"
        );
    }

    #[test]
    fn list_preserves_input_order() {
        let coords = parse_coordinates("g:c:1;g:a:aar:2;g:b:3").expect("valid list");
        let names: Vec<&str> = coords.iter().map(ArtifactCoordinate::name).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  ")]
    #[case::separators_only(";;")]
    fn blank_list_is_empty(#[case] list: &str) {
        assert!(parse_coordinates(list).expect("blank list").is_empty());
    }

    #[test]
    fn list_fails_on_first_malformed_token() {
        let err = parse_coordinates("g:a:1.0;broken;g:x").expect_err("expected failure");
        assert!(matches!(
            err,
            CoordinateError::MalformedCoordinate { ref token, .. } if token == "broken"
        ));
    }

    #[test]
    fn from_str_matches_parse() {
        let coord: ArtifactCoordinate = "g:a:aar:1.0".parse().expect("valid coordinate");
        assert_eq!(coord.packaging(), "aar");
    }
}
