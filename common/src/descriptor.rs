//! Minimal POM rendering for flattened artifacts.
//!
//! The template is reproduced byte for byte; only the four placeholders
//! change. Values are inserted verbatim, so callers must not pass fields
//! containing XML markup.

use crate::coordinate::ArtifactCoordinate;

/// Placeholder for the group id.
pub const GROUP_ID_PLACEHOLDER: &str = "__POM_GROUPID__";
/// Placeholder for the artifact id.
pub const ARTIFACT_ID_PLACEHOLDER: &str = "__POM_ARTIFACTID__";
/// Placeholder for the version.
pub const VERSION_PLACEHOLDER: &str = "__POM_VERSION__";
/// Placeholder for the packaging.
pub const PACKAGING_PLACEHOLDER: &str = "__POM_PACKAGING__";

/// The descriptor template.
pub const POM_TEMPLATE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<project xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd\" xmlns=\"http://maven.apache.org/POM/4.0.0\"\n",
    "    xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n",
    "    <modelVersion>4.0.0</modelVersion>\n",
    "    <groupId>__POM_GROUPID__</groupId>\n",
    "    <artifactId>__POM_ARTIFACTID__</artifactId>\n",
    "    <version>__POM_VERSION__</version>\n",
    "    <packaging>__POM_PACKAGING__</packaging>\n",
    "</project>\n",
);

/// Render the descriptor for `coord`.
///
/// # Examples
///
/// ```
/// use unaar_common::{ArtifactCoordinate, render_descriptor};
///
/// let pom = render_descriptor(&ArtifactCoordinate::new("acme.g", "a", "jar", "1.0"));
/// assert!(pom.contains("<groupId>acme.g</groupId>"));
/// assert!(pom.contains("<packaging>jar</packaging>"));
/// ```
#[must_use]
pub fn render_descriptor(coord: &ArtifactCoordinate) -> String {
    POM_TEMPLATE
        .replace(GROUP_ID_PLACEHOLDER, coord.namespace())
        .replace(ARTIFACT_ID_PLACEHOLDER, coord.name())
        .replace(VERSION_PLACEHOLDER, coord.version())
        .replace(PACKAGING_PLACEHOLDER, coord.packaging())
}
