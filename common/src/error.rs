//! Error types for coordinate parsing.
//!
//! Flattening and descriptor rendering are total, so parsing is the only
//! fallible operation in this crate.

use thiserror::Error;

/// Errors arising from invalid coordinate input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// A token does not have the `namespace:name[:packaging]:version` shape.
    #[error("unable to parse artifact \"{token}\": {reason}")]
    MalformedCoordinate {
        /// The offending token as supplied by the caller.
        token: String,
        /// Description of the violated constraint.
        reason: String,
    },
}

/// Result type alias using [`CoordinateError`].
pub type Result<T> = std::result::Result<T, CoordinateError>;
