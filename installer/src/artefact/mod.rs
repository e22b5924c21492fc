//! Remote archive access and payload extraction.
//!
//! # Sub-modules
//!
//! - [`download`] - Artefact source trait and HTTP implementation.
//! - [`extraction`] - Sequential zip scanning for the `classes.jar` payload.

pub mod download;
pub mod extraction;
