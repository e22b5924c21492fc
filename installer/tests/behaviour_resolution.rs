//! Behaviour-driven tests for artifact resolution.
//!
//! These scenarios drive the resolver end to end against a scripted source
//! and a recording sink, covering repository fallback, shadow groups, and
//! the failure modes that stop a run.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use unaar::error::UnaarError;
use unaar::repository::RepositoryList;
use unaar::resolver::{ResolutionReport, Resolver};
use unaar::staging::StagingArea;
use unaar::test_utils::{
    RecordedInstall, RecordingSink, ScriptedSource, aar_archive, streamed_aar_archive, zip_archive,
};
use unaar_common::render_descriptor;

const REPOSITORIES: [&str; 3] = [
    "https://one.test/m2",
    "https://two.test/m2",
    "https://three.test/m2",
];

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ResolutionWorld {
    source: ScriptedSource,
    shadow_group: Option<String>,
    outcome: Option<Result<ResolutionReport, UnaarError>>,
    requests: Vec<String>,
    installs: Vec<RecordedInstall>,
}

impl ResolutionWorld {
    fn serve(&mut self, index: usize, path: &str, body: Vec<u8>) {
        let repository = REPOSITORIES
            .get(index.checked_sub(1).expect("repositories are numbered from 1"))
            .expect("repository index in range");
        let source = std::mem::take(&mut self.source);
        self.source = source.serve(format!("{repository}/{path}"), body);
    }

    fn resolve(&mut self, artifacts: &str) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(dir.path().join("unaar")).expect("UTF-8 path");
        let staging = StagingArea::new(root);
        let repositories = RepositoryList::from_urls(REPOSITORIES);
        let sink = RecordingSink::new();

        let outcome = Resolver::new(&self.source, &sink, &repositories, &staging)
            .with_shadow_group(self.shadow_group.as_deref())
            .run(artifacts);

        self.outcome = Some(outcome);
        self.requests = self.source.requests();
        self.installs = sink.installs();
    }
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("repository {index} serves \"{path}\" with a classes payload")]
fn given_archive_with_payload(world: &mut ResolutionWorld, index: usize, path: String) {
    let body = aar_archive(b"compiled classes").expect("archive");
    world.serve(index, &path, body);
}

#[given("repository {index} streams \"{path}\" with data descriptors")]
fn given_streamed_archive(world: &mut ResolutionWorld, index: usize, path: String) {
    let body = streamed_aar_archive(b"compiled classes").expect("archive");
    world.serve(index, &path, body);
}

#[given("repository {index} serves \"{path}\" without a classes payload")]
fn given_archive_without_payload(world: &mut ResolutionWorld, index: usize, path: String) {
    let body = zip_archive(&[("AndroidManifest.xml", b"<manifest/>".as_slice())])
        .expect("archive");
    world.serve(index, &path, body);
}

#[given("repository {index} serves \"{path}\" as a corrupt archive")]
fn given_corrupt_archive(world: &mut ResolutionWorld, index: usize, path: String) {
    world.serve(index, &path, b"<html>moved</html>".to_vec());
}

#[given("the shadow group \"{prefix}\"")]
fn given_shadow_group(world: &mut ResolutionWorld, prefix: String) {
    world.shadow_group = Some(prefix);
}

#[when("the artifacts \"{artifacts}\" are resolved")]
fn when_artifacts_resolved(world: &mut ResolutionWorld, artifacts: String) {
    world.resolve(&artifacts);
}

#[when("an empty artifact list is resolved")]
fn when_empty_list_resolved(world: &mut ResolutionWorld) {
    world.resolve("");
}

#[then("resolution succeeds")]
fn then_resolution_succeeds(world: &mut ResolutionWorld) {
    let outcome = world.outcome.as_ref().expect("resolution not run");
    assert!(outcome.is_ok(), "expected success, got {outcome:?}");
}

#[then("resolution fails with \"{message}\"")]
fn then_resolution_fails(world: &mut ResolutionWorld, message: String) {
    let outcome = world.outcome.as_ref().expect("resolution not run");
    let err = outcome.as_ref().expect_err("expected resolution to fail");
    assert!(
        err.to_string().contains(&message),
        "expected error containing {message:?}, got {err}"
    );
}

#[then("{count} repositories were queried")]
fn then_repositories_queried(world: &mut ResolutionWorld, count: usize) {
    assert_eq!(world.requests.len(), count, "requests: {:?}", world.requests);
}

#[then("nothing is installed")]
fn then_nothing_installed(world: &mut ResolutionWorld) {
    assert!(world.installs.is_empty());
}

#[then("\"{coordinate}\" is installed from \"{archive}\" and \"{descriptor}\"")]
fn then_installed_from(
    world: &mut ResolutionWorld,
    coordinate: String,
    archive: String,
    descriptor: String,
) {
    let [install] = world.installs.as_slice() else {
        panic!("expected exactly one install, got {}", world.installs.len());
    };
    assert_eq!(install.request.coordinate.to_string(), coordinate);
    assert_eq!(install.request.archive.file_name(), Some(archive.as_str()));
    assert_eq!(
        install.request.descriptor.file_name(),
        Some(descriptor.as_str())
    );
    assert_eq!(install.archive, b"compiled classes");
    assert_eq!(install.descriptor, render_descriptor(&install.request.coordinate));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Install an aar under a shadow group"
)]
fn scenario_install_under_shadow_group(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Keep plain jar artifacts under their own group"
)]
fn scenario_keep_jar_group(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Report an artifact no repository serves"
)]
fn scenario_report_unresolved(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Stop when an archive lacks the classes payload"
)]
fn scenario_stop_on_missing_payload(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Skip a repository serving a corrupt archive"
)]
fn scenario_skip_corrupt_archive(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Reject a malformed artifact before any download"
)]
fn scenario_reject_malformed(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Accept an empty artifact list"
)]
fn scenario_accept_empty_list(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/resolution.feature",
    name = "Install an aar written with data descriptors"
)]
fn scenario_install_streamed_archive(world: ResolutionWorld) {
    let _ = world;
}
