//! Shared test utilities for the zetup workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`](project::TestProject) builder that lays out
//!   a zetup project directory
//! - [`script`]: executable `sh` scripts standing in for python and other
//!   external programs (unix only)

pub mod project;
#[cfg(unix)]
pub mod script;
