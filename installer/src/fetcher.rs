//! Single-repository fetch of an artifact payload.
//!
//! A fetch opens the artifact URL in one repository, scans the archive
//! stream for `classes.jar`, and copies it to the output path. Network and
//! archive problems are a [`FetchOutcome::Miss`] so the caller can try the
//! next repository. A readable archive without the payload is a hard
//! [`UnaarError::PayloadEntryNotFound`].

use crate::artefact::download::ArtefactSource;
use crate::artefact::extraction::{PAYLOAD_ENTRY, ScanOutcome, extract_entry};
use crate::error::{Result, UnaarError};
use crate::repository::Repository;
use crate::staging::remove_if_present;
use camino::Utf8Path;
use log::{debug, info};
use unaar_common::ArtifactCoordinate;

/// The non-fatal outcome of one repository attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The payload was written to the output path.
    Fetched {
        /// The archive URL.
        url: String,
        /// Payload size in bytes.
        bytes: u64,
    },
    /// This repository could not serve the artifact.
    Miss {
        /// The archive URL.
        url: String,
        /// A human-readable explanation.
        reason: String,
    },
}

impl FetchOutcome {
    /// Returns `true` for [`FetchOutcome::Fetched`].
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

/// Fetch the payload of `source_coord` from `repository` into `output`.
///
/// The URL is built from the unflattened coordinate. The connection and
/// the output file are both released before this function returns.
///
/// # Errors
///
/// Returns [`UnaarError::PayloadEntryNotFound`] when the archive is read to
/// the end without a `classes.jar` entry, and [`UnaarError::OutputPreparation`]
/// when a partial output cannot be removed after a failed copy.
pub fn fetch_payload(
    source: &dyn ArtefactSource,
    source_coord: &ArtifactCoordinate,
    repository: &Repository,
    output: &Utf8Path,
) -> Result<FetchOutcome> {
    let url = repository.artifact_url(source_coord);
    debug!("Trying {url}");

    let mut reader = match source.open(&url) {
        Ok(reader) => reader,
        Err(err) => {
            return Ok(FetchOutcome::Miss {
                url,
                reason: err.to_string(),
            });
        }
    };

    info!("Fetching {url}");
    match extract_entry(&mut reader, PAYLOAD_ENTRY, output) {
        Ok(ScanOutcome::Copied { bytes }) => Ok(FetchOutcome::Fetched { url, bytes }),
        Ok(ScanOutcome::EntryMissing) => Err(UnaarError::PayloadEntryNotFound {
            url,
            entry: PAYLOAD_ENTRY,
        }),
        Err(err) => {
            remove_if_present(output)?;
            Ok(FetchOutcome::Miss {
                url,
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::download::{DownloadError, MockArtefactSource};
    use crate::test_utils::{aar_archive, streamed_aar_archive, zip_archive};
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::{Cursor, Read};

    const REPO: &str = "https://repo.test/maven2";
    const URL: &str = "https://repo.test/maven2/com/example/foo/2.1/foo-2.1.aar";

    struct Scratch {
        _dir: tempfile::TempDir,
        output: Utf8PathBuf,
    }

    #[fixture]
    fn scratch() -> Scratch {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
        Scratch {
            output: root.join("foo-2.1.jar"),
            _dir: dir,
        }
    }

    fn coord() -> ArtifactCoordinate {
        ArtifactCoordinate::new("com.example", "foo", "aar", "2.1")
    }

    fn serving(body: Vec<u8>) -> MockArtefactSource {
        let mut source = MockArtefactSource::new();
        source
            .expect_open()
            .withf(|url| url == URL)
            .times(1)
            .returning(move |_| Ok(Box::new(Cursor::new(body.clone())) as Box<dyn Read>));
        source
    }

    #[rstest]
    fn payload_is_copied_from_source_url(scratch: Scratch) {
        let source = serving(aar_archive(b"classes").expect("archive"));
        let outcome = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect("fetch");
        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                url: URL.to_owned(),
                bytes: 7
            }
        );
        assert_eq!(std::fs::read(&scratch.output).expect("read"), b"classes");
    }

    #[rstest]
    #[case::not_found(DownloadError::NotFound { url: URL.to_owned() }, "not found")]
    #[case::refused(
        DownloadError::HttpError { url: URL.to_owned(), reason: "connection refused".to_owned() },
        "connection refused"
    )]
    fn open_failures_are_misses(
        scratch: Scratch,
        #[case] error: DownloadError,
        #[case] expected: &str,
    ) {
        let mut source = MockArtefactSource::new();
        let mut error = Some(error);
        source
            .expect_open()
            .times(1)
            .returning(move |_| Err(error.take().expect("single call")));

        let outcome = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect("fetch");
        match outcome {
            FetchOutcome::Miss { reason, .. } => assert!(reason.contains(expected), "{reason}"),
            other => panic!("expected Miss, got {other:?}"),
        }
        assert!(!scratch.output.exists());
    }

    #[rstest]
    fn malformed_archive_is_a_miss(scratch: Scratch) {
        let source = serving(b"<html>502 Bad Gateway</html>".to_vec());
        let outcome = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect("fetch");
        assert!(!outcome.is_fetched());
        assert!(!scratch.output.exists());
    }

    #[rstest]
    fn truncated_payload_leaves_no_partial_file(scratch: Scratch) {
        let mut body = zip_archive(&[("classes.jar", vec![1_u8; 8192].as_slice())])
            .expect("archive");
        body.truncate(1024);
        let source = serving(body);

        let outcome = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect("fetch");
        assert!(!outcome.is_fetched());
        assert!(!scratch.output.exists());
    }

    #[rstest]
    fn archive_without_payload_is_fatal(scratch: Scratch) {
        let body = zip_archive(&[("AndroidManifest.xml", b"<manifest/>".as_slice())])
            .expect("archive");
        let source = serving(body);

        let err = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect_err("missing payload is fatal");
        assert!(matches!(
            err,
            UnaarError::PayloadEntryNotFound { ref url, entry: "classes.jar" } if url == URL
        ));
    }

    #[rstest]
    fn data_descriptor_archive_is_fetched(scratch: Scratch) {
        let source = serving(streamed_aar_archive(b"streamed classes").expect("archive"));

        let outcome = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect("fetch");

        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                url: URL.to_owned(),
                bytes: 16
            }
        );
        assert_eq!(
            std::fs::read(&scratch.output).expect("read"),
            b"streamed classes"
        );
    }

    #[rstest]
    fn empty_archive_is_fatal(scratch: Scratch) {
        let source = serving(zip_archive(&[]).expect("archive"));

        let err = fetch_payload(&source, &coord(), &Repository::new(REPO), &scratch.output)
            .expect_err("an empty archive lacks the payload");

        assert!(matches!(err, UnaarError::PayloadEntryNotFound { .. }));
        assert!(!scratch.output.exists());
    }
}
