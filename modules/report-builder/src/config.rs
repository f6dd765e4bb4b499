//! Configuration for the per-identity build orchestrator.

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportBuilderConfig {
    /// Build command invoked once per identity.
    pub command: String,

    /// Arguments passed to the build command.
    pub args: Vec<String>,

    /// Working directory for the build command; defaults to the caller's.
    pub workdir: Option<PathBuf>,

    /// Root directory receiving one namespace per identity.
    pub output_dir: PathBuf,

    /// Number of identity builds allowed to run concurrently.
    pub build_workers: usize,

    /// Restrict the run to a single identity (isolated rebuild).
    pub only_user: Option<String>,
}

impl Default for ReportBuilderConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            workdir: None,
            output_dir: PathBuf::from("build-users"),
            build_workers: 1,
            only_user: None,
        }
    }
}
