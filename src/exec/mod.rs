// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds platform shell commands and runs them to completion.
//! - [`backend`] provides the `BuildInvoker` trait and the production
//!   `CommandBuildInvoker` that runs the configured build steps.
//! - [`coverage`] runs the coverage remap/report collaborators.

pub mod backend;
pub mod command;
pub mod coverage;

pub use backend::{BuildInvoker, CommandBuildInvoker};
pub use coverage::process_coverage;
