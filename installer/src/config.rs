//! Run settings assembled from an optional `unaar.toml` and the CLI.
//!
//! The file supplies defaults; command-line values override it, except for
//! repositories, where the file's list comes first and CLI extras follow.
//! Built-in repositories always precede both unless disabled.

use crate::artefact::download::DOWNLOAD_TIMEOUT;
use crate::cli::Cli;
use crate::install::DEFAULT_MAVEN;
use crate::repository::RepositoryList;
use crate::staging::DEFAULT_OUTPUT_DIR;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use unaar_common::coordinate::LIST_SEPARATOR;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "unaar.toml";

/// Errors arising from loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// The config file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unexpected keys.
    #[error("invalid config file {path}: {reason}")]
    Parse {
        /// The config file path.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },
}

/// An artifact list written either as one `;`-separated string or as an
/// array of tokens.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum ArtifactList {
    /// `artifacts = "g:a:1.0;g:b:aar:2.0"`
    Joined(String),
    /// `artifacts = ["g:a:1.0", "g:b:aar:2.0"]`
    Tokens(Vec<String>),
}

impl ArtifactList {
    /// The list in its `;`-separated form.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Joined(list) => list.clone(),
            Self::Tokens(tokens) => tokens.join(&LIST_SEPARATOR.to_string()),
        }
    }
}

/// Contents of `unaar.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Artifacts to resolve.
    pub artifacts: Option<ArtifactList>,
    /// Namespace prefix for flattened `aar` artifacts.
    pub shadow_group: Option<String>,
    /// Staging directory.
    pub output_dir: Option<Utf8PathBuf>,
    /// Extra repositories, searched after the built-in ones.
    pub repositories: Vec<String>,
    /// Whether the built-in repositories are searched.
    pub default_repositories: Option<bool>,
    /// Network timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Maven executable.
    pub maven: Option<String>,
}

impl FileConfig {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] naming `path` on invalid input.
    pub fn parse(contents: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::Parse {
            path: path.to_owned(),
            reason: err.message().to_owned(),
        })
    }

    /// Load the config file named on the command line, or `unaar.toml` from
    /// the working directory when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when an explicitly named file cannot be
    /// read, and [`ConfigError::Parse`] for invalid contents.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_owned(),
            None => {
                let fallback = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents, &path)
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// `;`-separated artifact list; may be empty.
    pub artifacts: String,
    /// Namespace prefix for flattened `aar` artifacts.
    pub shadow_group: Option<String>,
    /// Staging directory.
    pub output_dir: Utf8PathBuf,
    /// Repositories in search order.
    pub repositories: RepositoryList,
    /// Network timeout per repository attempt.
    pub timeout: Duration,
    /// Maven executable.
    pub maven: String,
    /// Skip the Maven install step.
    pub stage_only: bool,
}

impl Settings {
    /// Load the config file selected by `cli` and merge it with `cli`.
    ///
    /// # Errors
    ///
    /// Propagates [`FileConfig::load`] errors.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = FileConfig::load(cli.config.as_deref())?;
        Ok(Self::merge(cli, file))
    }

    /// Merge CLI values over file values.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use unaar::cli::Cli;
    /// use unaar::config::{FileConfig, Settings};
    ///
    /// let cli = Cli::parse_from(["unaar", "--artifacts", "g:a:aar:1", "--shadow-group", "acme"]);
    /// let file = FileConfig {
    ///     shadow_group: Some("ignored".to_owned()),
    ///     ..FileConfig::default()
    /// };
    /// let settings = Settings::merge(&cli, file);
    /// assert_eq!(settings.shadow_group.as_deref(), Some("acme"));
    /// assert_eq!(settings.repositories.len(), 3);
    /// ```
    #[must_use]
    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let use_defaults =
            !cli.no_default_repositories && file.default_repositories.unwrap_or(true);
        let base = if use_defaults {
            RepositoryList::defaults()
        } else {
            RepositoryList::from_urls(Vec::<String>::new())
        };
        let repositories = base
            .with_extra(&file.repositories)
            .with_extra(&cli.repository);

        Self {
            artifacts: cli
                .artifacts
                .clone()
                .or_else(|| file.artifacts.as_ref().map(ArtifactList::joined))
                .unwrap_or_default(),
            shadow_group: cli.shadow_group.clone().or(file.shadow_group),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
            repositories,
            timeout: cli
                .timeout
                .or(file.timeout_secs)
                .map_or(DOWNLOAD_TIMEOUT, Duration::from_secs),
            maven: cli
                .maven
                .clone()
                .or(file.maven)
                .unwrap_or_else(|| DEFAULT_MAVEN.to_owned()),
            stage_only: cli.stage_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{DEFAULT_REPOSITORIES, Repository};
    use clap::Parser;
    use rstest::rstest;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("unaar").chain(args.iter().copied()))
    }

    fn urls(list: &RepositoryList) -> Vec<&str> {
        list.iter().map(Repository::as_str).collect()
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::merge(&cli(&[]), FileConfig::default());
        assert_eq!(settings.artifacts, "");
        assert_eq!(settings.shadow_group, None);
        assert_eq!(settings.output_dir.as_str(), DEFAULT_OUTPUT_DIR);
        assert_eq!(urls(&settings.repositories), DEFAULT_REPOSITORIES);
        assert_eq!(settings.timeout, DOWNLOAD_TIMEOUT);
        assert_eq!(settings.maven, DEFAULT_MAVEN);
        assert!(!settings.stage_only);
    }

    #[rstest]
    #[case::joined(r#"artifacts = "g:a:1.0;g:b:aar:2.0""#)]
    #[case::array(r#"artifacts = ["g:a:1.0", "g:b:aar:2.0"]"#)]
    fn artifact_list_accepts_both_forms(#[case] toml_text: &str) {
        let file = FileConfig::parse(toml_text, Utf8Path::new("unaar.toml")).expect("parse");
        let settings = Settings::merge(&cli(&[]), file);
        assert_eq!(settings.artifacts, "g:a:1.0;g:b:aar:2.0");
    }

    #[test]
    fn cli_overrides_file_values() {
        let file = FileConfig::parse(
            concat!(
                "artifacts = \"g:file:1\"\n",
                "shadow_group = \"file\"\n",
                "output_dir = \"file-out\"\n",
                "timeout_secs = 5\n",
                "maven = \"mvnw\"\n",
            ),
            Utf8Path::new("unaar.toml"),
        )
        .expect("parse");
        let settings = Settings::merge(
            &cli(&[
                "-a", "g:cli:1", "-s", "cli", "-o", "cli-out", "--timeout", "9", "--maven", "mvn3",
            ]),
            file,
        );
        assert_eq!(settings.artifacts, "g:cli:1");
        assert_eq!(settings.shadow_group.as_deref(), Some("cli"));
        assert_eq!(settings.output_dir.as_str(), "cli-out");
        assert_eq!(settings.timeout, Duration::from_secs(9));
        assert_eq!(settings.maven, "mvn3");
    }

    #[test]
    fn file_values_fill_gaps() {
        let file = FileConfig::parse(
            "shadow_group = \"acme\"\ntimeout_secs = 5\n",
            Utf8Path::new("unaar.toml"),
        )
        .expect("parse");
        let settings = Settings::merge(&cli(&[]), file);
        assert_eq!(settings.shadow_group.as_deref(), Some("acme"));
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn repositories_concatenate_in_order() {
        let file = FileConfig::parse(
            "repositories = [\"https://file.test/m2\"]\n",
            Utf8Path::new("unaar.toml"),
        )
        .expect("parse");
        let settings = Settings::merge(&cli(&["-r", "https://cli.test/m2/"]), file);
        let mut expected = DEFAULT_REPOSITORIES.to_vec();
        expected.extend(["https://file.test/m2", "https://cli.test/m2"]);
        assert_eq!(urls(&settings.repositories), expected);
    }

    #[rstest]
    #[case::flag(&["--no-default-repositories", "-r", "https://only.test"], "")]
    #[case::file(&["-r", "https://only.test"], "default_repositories = false\n")]
    fn defaults_can_be_disabled(#[case] args: &[&str], #[case] toml_text: &str) {
        let file = FileConfig::parse(toml_text, Utf8Path::new("unaar.toml")).expect("parse");
        let settings = Settings::merge(&cli(args), file);
        assert_eq!(urls(&settings.repositories), ["https://only.test"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FileConfig::parse("shadowGroup = \"acme\"\n", Utf8Path::new("cfg/unaar.toml"))
            .expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path.as_str() == "cfg/unaar.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
        let err = FileConfig::load(Some(&root.join("absent.toml"))).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
        let path = root.join("unaar.toml");
        std::fs::write(&path, "shadow_group = \"acme\"\n").expect("write config");

        let file = FileConfig::load(Some(&path)).expect("load");
        assert_eq!(file.shadow_group.as_deref(), Some("acme"));
    }
}
