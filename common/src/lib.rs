//! Pure domain model for unaar: artifact coordinates, identity flattening,
//! and descriptor rendering.
//!
//! Nothing in this crate performs I/O; the `unaar` installer crate drives
//! these helpers from its fetch and install pipeline.

pub mod coordinate;
pub mod descriptor;
pub mod error;
pub mod flatten;

pub use coordinate::{
    ArtifactCoordinate, DEFAULT_PACKAGING, DESCRIPTOR_EXTENSION, parse_coordinates,
};
pub use descriptor::{POM_TEMPLATE, render_descriptor};
pub use error::CoordinateError;
pub use flatten::{FLATTENED_PACKAGING, NamespacePrefix, flatten};
