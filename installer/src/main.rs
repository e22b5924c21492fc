//! unaar CLI entrypoint.
//!
//! This binary resolves a list of Android libraries against Maven
//! repositories, stages each one as a jar with a generated POM, and installs
//! it into the local Maven repository.

use clap::Parser;
use log::info;
use std::io::Write;
use unaar::artefact::download::HttpSource;
use unaar::cli::Cli;
use unaar::config::Settings;
use unaar::error::Result;
use unaar::install::{InstallSink, MavenInstallSink, StageOnlySink, SystemCommandExecutor};
use unaar::logging;
use unaar::resolver::{ResolutionReport, Resolver};
use unaar::staging::StagingArea;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load(cli)?;
    let source = HttpSource::new(settings.timeout);
    let staging = StagingArea::new(settings.output_dir.clone());
    let executor = SystemCommandExecutor;
    let maven = MavenInstallSink::new(&executor, settings.maven.clone());
    let sink = select_sink(&settings, &maven);

    let report = Resolver::new(&source, sink, &settings.repositories, &staging)
        .with_shadow_group(settings.shadow_group.as_deref())
        .run(&settings.artifacts)?;

    info!("{}", summary(&report, &settings));
    Ok(())
}

/// Picks the sink requested by `--stage-only`.
fn select_sink<'a>(settings: &Settings, maven: &'a MavenInstallSink<'a>) -> &'a dyn InstallSink {
    if settings.stage_only {
        &StageOnlySink
    } else {
        maven
    }
}

/// One-line outcome of a run.
fn summary(report: &ResolutionReport, settings: &Settings) -> String {
    if report.is_empty() {
        return "No artifacts requested".to_owned();
    }
    let verb = if settings.stage_only { "Staged" } else { "Installed" };
    format!(
        "{verb} {} artifact(s) in {}",
        report.installed.len(),
        settings.output_dir
    )
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
