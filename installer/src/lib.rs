//! unaar library.
//!
//! This crate fetches Android libraries from Maven repositories, extracts the
//! `classes.jar` payload from each archive, writes a minimal POM for it, and
//! installs the pair into the local Maven repository. It is used by the
//! `unaar` CLI binary and can be driven programmatically through
//! [`resolver::Resolver`] with custom sources and sinks.
//!
//! # Modules
//!
//! - [`artefact`] - Archive download and payload extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Configuration file loading and CLI merging
//! - [`error`] - Semantic error types for a run
//! - [`fetcher`] - Single-repository payload fetch
//! - [`install`] - Install sinks and the Maven command wrapper
//! - [`logging`] - Logger initialisation
//! - [`repository`] - Repository URLs and search order
//! - [`resolver`] - Repository fallback and installation orchestration
//! - [`staging`] - Output directory layout

pub mod artefact;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod install;
pub mod logging;
pub mod repository;
pub mod resolver;
pub mod staging;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
