//! Per-Identity Build Orchestrator
//!
//! Drives one isolated build per identity out of a resolved
//! [`AccessReport`](access_resolver::AccessReport): injects the identity's
//! accessibility set as build context, captures success and failure
//! independently per identity, and relocates each successful artifact set
//! into a namespace keyed by the identity's stable id.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::ReportBuilderConfig;
pub use domain::runner::{BuildContext, BuildError, BuildRunner};
pub use domain::service::{BuildState, BuildSummary, FailedBuild, Service};
pub use infra::process::ProcessBuildRunner;
