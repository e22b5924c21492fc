//! Hand-off of staged artifacts to an installer.
//!
//! The resolver calls an [`InstallSink`] once per resolved artifact, after
//! both the archive and its descriptor are on disk. Registering them in a
//! local repository is delegated to Maven's `install-file` goal; unaar only
//! assembles the invocation.

use camino::Utf8PathBuf;
use log::info;
use std::process::{Command, Output};
use unaar_common::ArtifactCoordinate;

/// Fully qualified `install-file` goal used by [`MavenInstallSink`].
pub const INSTALL_FILE_GOAL: &str = "org.apache.maven.plugins:maven-install-plugin:2.5.2:install-file";

/// Default Maven executable.
pub const DEFAULT_MAVEN: &str = "mvn";

/// One staged artifact ready for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// The extracted library archive.
    pub archive: Utf8PathBuf,
    /// The generated descriptor.
    pub descriptor: Utf8PathBuf,
    /// The identity to install under (already flattened).
    pub coordinate: ArtifactCoordinate,
}

/// Errors arising from the install step.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The installer process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The executable that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The installer ran but reported failure.
    #[error("{program} exited with {status} while installing {coordinate}: {stderr}")]
    CommandFailed {
        /// The executable that failed.
        program: String,
        /// Exit status description.
        status: String,
        /// Identity being installed, in token form.
        coordinate: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A staged file disappeared before installation.
    #[error("staged file {path} is missing")]
    MissingStagedFile {
        /// The missing path.
        path: Utf8PathBuf,
    },
}

/// Receives staged artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait InstallSink {
    /// Install one artifact.
    ///
    /// # Errors
    ///
    /// Returns an [`InstallError`] when the artifact cannot be installed;
    /// the resolver stops the run.
    fn install(&self, request: &InstallRequest) -> Result<(), InstallError>;
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output> {
        Command::new(program).args(args).output()
    }
}

/// Installs artifacts with `mvn install:install-file`.
pub struct MavenInstallSink<'a> {
    executor: &'a dyn CommandExecutor,
    program: String,
}

impl<'a> MavenInstallSink<'a> {
    /// Create a sink running `program` through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    /// Arguments passed to Maven for `request`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use unaar::install::{InstallRequest, MavenInstallSink};
    /// use unaar_common::ArtifactCoordinate;
    ///
    /// let request = InstallRequest {
    ///     archive: Utf8PathBuf::from("target/unaar/foo-2.1.jar"),
    ///     descriptor: Utf8PathBuf::from("target/unaar/foo-2.1.pom"),
    ///     coordinate: ArtifactCoordinate::new("acme.com.example", "foo", "jar", "2.1"),
    /// };
    /// let args = MavenInstallSink::arguments(&request);
    /// assert!(args.contains(&"-DgroupId=acme.com.example".to_owned()));
    /// ```
    #[must_use]
    pub fn arguments(request: &InstallRequest) -> Vec<String> {
        let coord = &request.coordinate;
        vec![
            "-B".to_owned(),
            "-q".to_owned(),
            INSTALL_FILE_GOAL.to_owned(),
            format!("-Dfile={}", request.archive),
            format!("-DgroupId={}", coord.namespace()),
            format!("-DartifactId={}", coord.name()),
            format!("-Dversion={}", coord.version()),
            format!("-Dpackaging={}", coord.packaging()),
            format!("-DpomFile={}", request.descriptor),
        ]
    }
}

impl InstallSink for MavenInstallSink<'_> {
    fn install(&self, request: &InstallRequest) -> Result<(), InstallError> {
        for path in [&request.archive, &request.descriptor] {
            if !path.is_file() {
                return Err(InstallError::MissingStagedFile { path: path.clone() });
            }
        }

        let args = Self::arguments(request);
        let output = self
            .executor
            .run(&self.program, &args)
            .map_err(|source| InstallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                coordinate: request.coordinate.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        info!("Installed {}", request.coordinate);
        Ok(())
    }
}

/// Leaves artifacts staged without installing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageOnlySink;

impl InstallSink for StageOnlySink {
    fn install(&self, request: &InstallRequest) -> Result<(), InstallError> {
        info!(
            "Staged {} as {} with {} (install skipped)",
            request.coordinate, request.archive, request.descriptor
        );
        Ok(())
    }
}
