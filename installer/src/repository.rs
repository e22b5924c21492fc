//! Remote repositories searched for artifacts.
//!
//! Repositories are tried in list order and the first one that serves the
//! artifact wins, so the order of [`DEFAULT_REPOSITORIES`] and of any
//! configured extras is significant.

use std::fmt;
use unaar_common::ArtifactCoordinate;

/// Built-in repositories, in priority order.
pub const DEFAULT_REPOSITORIES: [&str; 3] = [
    "https://repo.maven.apache.org/maven2",
    "https://dl.google.com/dl/android/maven2",
    "https://jcenter.bintray.com",
];

/// A Maven-layout repository base URL.
///
/// # Examples
///
/// ```
/// use unaar::repository::Repository;
/// use unaar_common::ArtifactCoordinate;
///
/// let repo = Repository::new("https://repo.test/maven2/");
/// let coord = ArtifactCoordinate::new("com.example", "foo", "aar", "2.1");
/// assert_eq!(
///     repo.artifact_url(&coord),
///     "https://repo.test/maven2/com/example/foo/2.1/foo-2.1.aar"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository(String);

impl Repository {
    /// Create a repository, trimming surrounding whitespace and trailing
    /// slashes from the base URL.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self(base_url.as_ref().trim().trim_end_matches('/').to_owned())
    }

    /// The normalised base URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The download URL of `coord` in this repository.
    #[must_use]
    pub fn artifact_url(&self, coord: &ArtifactCoordinate) -> String {
        format!("{}/{}", self.0, coord.repository_path())
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered, read-only list of repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryList(Vec<Repository>);

impl RepositoryList {
    /// The built-in repositories.
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_urls(DEFAULT_REPOSITORIES)
    }

    /// Build a list from base URLs, keeping their order.
    #[must_use]
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(urls.into_iter().map(Repository::new).collect())
    }

    /// Append `urls` after the existing entries.
    ///
    /// URLs already present are skipped so that a mirror listed twice is not
    /// queried twice.
    #[must_use]
    pub fn with_extra<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for repo in urls.into_iter().map(Repository::new) {
            if !self.0.contains(&repo) {
                self.0.push(repo);
            }
        }
        self
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.0.iter()
    }

    /// Number of repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no repository is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RepositoryList {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<'a> IntoIterator for &'a RepositoryList {
    type Item = &'a Repository;
    type IntoIter = std::slice::Iter<'a, Repository>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
