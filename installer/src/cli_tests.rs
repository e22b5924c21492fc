//! Unit tests for CLI argument parsing.

use super::*;
use clap::CommandFactory;
use rstest::rstest;

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn no_arguments_is_valid() {
    let cli = Cli::try_parse_from(["unaar"]).expect("parse");
    assert_eq!(cli.artifacts, None);
    assert!(cli.repository.is_empty());
    assert!(!cli.stage_only);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn long_flags_are_parsed() {
    let cli = Cli::try_parse_from([
        "unaar",
        "--artifacts",
        "com.example:foo:aar:2.1",
        "--shadow-group",
        "acme",
        "--output-dir",
        "build/unaar",
        "--repository",
        "https://a.test",
        "--repository",
        "https://b.test",
        "--no-default-repositories",
        "--timeout",
        "10",
        "--maven",
        "./mvnw",
        "--stage-only",
    ])
    .expect("parse");

    assert_eq!(cli.artifacts.as_deref(), Some("com.example:foo:aar:2.1"));
    assert_eq!(cli.shadow_group.as_deref(), Some("acme"));
    assert_eq!(
        cli.output_dir.as_ref().map(|dir| dir.as_str()),
        Some("build/unaar")
    );
    assert_eq!(cli.repository, ["https://a.test", "https://b.test"]);
    assert!(cli.no_default_repositories);
    assert_eq!(cli.timeout, Some(10));
    assert_eq!(cli.maven.as_deref(), Some("./mvnw"));
    assert!(cli.stage_only);
}

#[rstest]
#[case::single(&["unaar", "-v"], 1)]
#[case::double(&["unaar", "-vv"], 2)]
#[case::separate(&["unaar", "-v", "-v", "-v"], 3)]
fn verbosity_counts(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::try_parse_from(args).expect("parse");
    assert_eq!(cli.verbose, expected);
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["unaar", "-q", "-v"]);
    assert!(result.is_err());
}

#[test]
fn non_numeric_timeout_is_rejected() {
    let result = Cli::try_parse_from(["unaar", "--timeout", "soon"]);
    assert!(result.is_err());
}
