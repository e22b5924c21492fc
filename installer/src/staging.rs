//! Output files for flattened artifacts.
//!
//! Each flattened coordinate owns two deterministic paths in the staging
//! directory: `<name>-<version>.<packaging>` and `<name>-<version>.pom`.
//! Both are removed before every repository attempt so a failed attempt
//! never leaves content from an earlier run behind.

use crate::error::{Result, UnaarError};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::ErrorKind;
use unaar_common::{ArtifactCoordinate, render_descriptor};

/// Default staging directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "target/unaar";

/// The archive and descriptor paths for one flattened artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Destination of the extracted payload.
    pub archive: Utf8PathBuf,
    /// Destination of the generated descriptor.
    pub descriptor: Utf8PathBuf,
}

/// The directory receiving staged artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    root: Utf8PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at `root`. Nothing is created on disk
    /// until [`Self::prepare`] runs.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The staging directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Create the staging directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns [`UnaarError::OutputPreparation`] if the directory cannot be
    /// created.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|source| UnaarError::OutputPreparation {
            path: self.root.clone(),
            source,
        })
    }

    /// Paths for a flattened coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaar::staging::StagingArea;
    /// use unaar_common::ArtifactCoordinate;
    ///
    /// let staging = StagingArea::new("target/unaar");
    /// let paths = staging.paths_for(&ArtifactCoordinate::new("acme.g", "foo", "jar", "2.1"));
    /// assert_eq!(paths.archive.as_str(), "target/unaar/foo-2.1.jar");
    /// assert_eq!(paths.descriptor.as_str(), "target/unaar/foo-2.1.pom");
    /// ```
    #[must_use]
    pub fn paths_for(&self, flattened: &ArtifactCoordinate) -> ArtifactPaths {
        ArtifactPaths {
            archive: self.root.join(flattened.archive_filename()),
            descriptor: self.root.join(flattened.descriptor_filename()),
        }
    }

    /// Remove any existing archive and descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`UnaarError::OutputPreparation`] for any failure other than
    /// the file being absent.
    pub fn clear(&self, paths: &ArtifactPaths) -> Result<()> {
        remove_if_present(&paths.archive)?;
        remove_if_present(&paths.descriptor)
    }

    /// Render and write the descriptor for `flattened`.
    ///
    /// # Errors
    ///
    /// Returns [`UnaarError::DescriptorWriteFailure`] if the file cannot be
    /// written.
    pub fn write_descriptor(
        &self,
        paths: &ArtifactPaths,
        flattened: &ArtifactCoordinate,
    ) -> Result<()> {
        std::fs::write(&paths.descriptor, render_descriptor(flattened)).map_err(|source| {
            UnaarError::DescriptorWriteFailure {
                path: paths.descriptor.clone(),
                source,
            }
        })?;
        debug!("Wrote descriptor {}", paths.descriptor);
        Ok(())
    }
}

impl Default for StagingArea {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

/// Remove `path`, treating an absent file as success.
pub(crate) fn remove_if_present(path: &Utf8Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(UnaarError::OutputPreparation {
            path: path.to_owned(),
            source,
        }),
    }
}
