//! Repository fallback and installation orchestrator.
//!
//! Artifacts are resolved one at a time, in input order. For each artifact
//! the repositories are tried in priority order until one serves the
//! payload; the descriptor is then written and the pair is handed to the
//! install sink before the next artifact starts. Any error stops the run:
//! there is no partial-success mode.

use crate::artefact::download::ArtefactSource;
use crate::error::{Result, UnaarError};
use crate::fetcher::{FetchOutcome, fetch_payload};
use crate::install::{InstallRequest, InstallSink};
use crate::repository::{Repository, RepositoryList};
use crate::staging::{ArtifactPaths, StagingArea};
use log::{debug, info, warn};
use std::fmt;
use unaar_common::{ArtifactCoordinate, flatten, parse_coordinates};

/// Progress of a single artifact through the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState<'r> {
    /// Parsed but not yet attempted.
    Pending,
    /// Attempting the repository at `index` (zero-based).
    Trying {
        /// Position in the repository list.
        index: usize,
        /// The repository being queried.
        repository: &'r Repository,
    },
    /// Fetched, described, and handed to the sink.
    Installed,
    /// Resolution stopped with an error.
    Aborted,
}

impl fmt::Display for ArtifactState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Trying { index, repository } => {
                write!(f, "trying repository #{} ({repository})", index + 1)
            }
            Self::Installed => f.write_str("installed"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// A successfully resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtifact {
    /// The coordinate as requested.
    pub source: ArtifactCoordinate,
    /// The flattened identity it was installed under.
    pub installed: ArtifactCoordinate,
    /// The repository that served it.
    pub repository: Repository,
    /// Where the archive and descriptor were staged.
    pub paths: ArtifactPaths,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Installed artifacts, in input order.
    pub installed: Vec<InstalledArtifact>,
}

impl ResolutionReport {
    /// Returns `true` when nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

/// Resolves artifacts against an ordered repository list.
pub struct Resolver<'a> {
    source: &'a dyn ArtefactSource,
    sink: &'a dyn InstallSink,
    repositories: &'a RepositoryList,
    staging: &'a StagingArea,
    shadow_group: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given seams and settings.
    #[must_use]
    pub fn new(
        source: &'a dyn ArtefactSource,
        sink: &'a dyn InstallSink,
        repositories: &'a RepositoryList,
        staging: &'a StagingArea,
    ) -> Self {
        Self {
            source,
            sink,
            repositories,
            staging,
            shadow_group: None,
        }
    }

    /// Set the namespace prefix applied to flattened `aar` artifacts.
    #[must_use]
    pub fn with_shadow_group(mut self, shadow_group: Option<&'a str>) -> Self {
        self.shadow_group = shadow_group;
        self
    }

    /// Parse a `;`-separated artifact list and resolve every entry.
    ///
    /// The whole list is parsed before any network access, so a malformed
    /// token fails fast without partial work. An empty list is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first parse, fetch, staging, or install error.
    pub fn run(&self, artifacts: &str) -> Result<ResolutionReport> {
        let coords = parse_coordinates(artifacts)?;
        self.resolve_all(&coords)
    }

    /// Resolve `coords` sequentially, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Self::resolve`]. An empty list
    /// leaves the staging directory untouched.
    pub fn resolve_all(&self, coords: &[ArtifactCoordinate]) -> Result<ResolutionReport> {
        let mut report = ResolutionReport::default();
        for coord in coords {
            report.installed.push(self.resolve(coord)?);
        }
        Ok(report)
    }

    /// Resolve and install one artifact, creating the staging directory
    /// first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`UnaarError::OutputPreparation`] when the staging directory
    /// cannot be created, [`UnaarError::AllRepositoriesExhausted`] naming
    /// `coord` when every repository misses, and propagates
    /// [`UnaarError::PayloadEntryNotFound`], descriptor, and install errors
    /// unchanged.
    pub fn resolve(&self, coord: &ArtifactCoordinate) -> Result<InstalledArtifact> {
        log_state(coord, ArtifactState::Pending);
        let result = self.try_repositories(coord);
        match &result {
            Ok(_) => log_state(coord, ArtifactState::Installed),
            Err(_) => log_state(coord, ArtifactState::Aborted),
        }
        result
    }

    fn try_repositories(&self, coord: &ArtifactCoordinate) -> Result<InstalledArtifact> {
        let flattened = flatten(coord, self.shadow_group);
        let paths = self.staging.paths_for(&flattened);
        self.staging.prepare()?;

        for (index, repository) in self.repositories.iter().enumerate() {
            log_state(coord, ArtifactState::Trying { index, repository });
            self.staging.clear(&paths)?;

            match fetch_payload(self.source, coord, repository, &paths.archive)? {
                FetchOutcome::Fetched { url, bytes } => {
                    debug!("Extracted {bytes} bytes from {url} to {}", paths.archive);
                    return self.install(coord, flattened, repository, paths);
                }
                FetchOutcome::Miss { url, reason } => {
                    warn!("{coord} not available at {url}: {reason}");
                }
            }
        }

        Err(UnaarError::AllRepositoriesExhausted {
            coordinate: coord.clone(),
        })
    }

    fn install(
        &self,
        coord: &ArtifactCoordinate,
        flattened: ArtifactCoordinate,
        repository: &Repository,
        paths: ArtifactPaths,
    ) -> Result<InstalledArtifact> {
        self.staging.write_descriptor(&paths, &flattened)?;

        let request = InstallRequest {
            archive: paths.archive.clone(),
            descriptor: paths.descriptor.clone(),
            coordinate: flattened,
        };
        self.sink.install(&request)?;

        if request.coordinate != *coord {
            info!("Resolved {coord} as {}", request.coordinate);
        }
        Ok(InstalledArtifact {
            source: coord.clone(),
            installed: request.coordinate,
            repository: repository.clone(),
            paths,
        })
    }
}

fn log_state(coord: &ArtifactCoordinate, state: ArtifactState<'_>) {
    debug!("{coord}: {state}");
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
