//! Error types for the unaar pipeline.
//!
//! Only conditions that stop the whole run live here. A repository that
//! cannot serve an artifact is not an error: the fetcher reports it as
//! [`crate::fetcher::FetchOutcome::Miss`] and the resolver moves on.

use crate::config::ConfigError;
use crate::install::InstallError;
use camino::Utf8PathBuf;
use thiserror::Error;
use unaar_common::{ArtifactCoordinate, CoordinateError};

/// Errors that abort a resolution run.
#[derive(Debug, Error)]
pub enum UnaarError {
    /// An input token could not be parsed.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    /// A repository served a readable archive without the payload entry.
    ///
    /// This stops the run instead of trying the next
    /// repository.
    #[error("unable to find {entry} in {url}")]
    PayloadEntryNotFound {
        /// The archive URL that was scanned.
        url: String,
        /// The entry name that was expected.
        entry: &'static str,
    },

    /// No configured repository could serve the artifact.
    #[error("unable to find artifact {coordinate}")]
    AllRepositoriesExhausted {
        /// The coordinate as requested, before flattening.
        coordinate: ArtifactCoordinate,
    },

    /// The descriptor could not be written.
    #[error("unable to save POM file {path}")]
    DescriptorWriteFailure {
        /// Destination of the descriptor.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created or cleared.
    #[error("unable to prepare output {path}")]
    OutputPreparation {
        /// The path being created or removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The install sink rejected a staged artifact.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias using [`UnaarError`].
pub type Result<T> = std::result::Result<T, UnaarError>;
