//! CLI argument definitions for unaar.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};

/// Fetch Android libraries, flatten them to jars, and install them.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "unaar")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch Android libraries, flatten them to jars, and install them.\n\n",
    "Each artifact is looked up in the configured Maven repositories in order. ",
    "The classes.jar inside the first archive found is extracted, a minimal POM ",
    "is generated, and both are installed into the local Maven repository with ",
    "`mvn install:install-file`.\n\n",
    "Artifacts with aar packaging are installed as jar, optionally under a ",
    "shadow group prefixed to their namespace.",
))]
#[command(after_help = concat!(
    "DEFAULT REPOSITORIES (searched in order):\n",
    "  https://repo.maven.apache.org/maven2\n",
    "  https://dl.google.com/dl/android/maven2\n",
    "  https://jcenter.bintray.com\n\n",
    "EXAMPLES:\n",
    "  Install an aar as a jar under acme.androidx.annotation:\n",
    "    $ unaar -a androidx.annotation:annotation-experimental:aar:1.1.0 -s acme\n\n",
    "  Stage several artifacts without installing:\n",
    "    $ unaar -a 'g:a:aar:1.0;g:b:2.0' --stage-only\n\n",
    "  Read settings from a file:\n",
    "    $ unaar --config ci/unaar.toml",
))]
pub struct Cli {
    /// Artifacts to resolve, separated by `;`.
    ///
    /// Each token is `group:artifact:version` or
    /// `group:artifact:packaging:version`.
    #[arg(short, long, value_name = "LIST")]
    pub artifacts: Option<String>,

    /// Namespace prefix applied to artifacts with aar packaging.
    #[arg(short, long, value_name = "PREFIX")]
    pub shadow_group: Option<String>,

    /// Directory receiving extracted archives and POMs [default: target/unaar].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Additional repository base URL, searched after the defaults (repeatable).
    #[arg(short, long, value_name = "URL")]
    pub repository: Vec<String>,

    /// Search only repositories given with --repository or in the config file.
    #[arg(long)]
    pub no_default_repositories: bool,

    /// Configuration file [default: unaar.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Network timeout per repository attempt, in seconds [default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maven executable used for installation [default: mvn].
    #[arg(long, value_name = "PATH")]
    pub maven: Option<String>,

    /// Extract and describe artifacts without installing them.
    #[arg(long)]
    pub stage_only: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
