//! Build runner port.

use std::path::Path;

use async_trait::async_trait;
use directory_sdk::AccountId;
use thiserror::Error;

/// Immutable build context for one identity.
///
/// Carries the identity's attributes and resolved accessibility set; the
/// runner injects them into the downstream build process. Each concurrent
/// build owns its own copy, so builders share no mutable state.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub user_id: String,
    pub user_name: String,
    pub account_ids: Vec<AccountId>,
}

/// Errors of a single identity build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build command could not be launched at all.
    #[error("failed to launch build command: {0}")]
    Launch(#[source] std::io::Error),

    /// The build process reported non-zero completion.
    #[error("build exited with {status}")]
    Failed { status: std::process::ExitStatus },
}

/// Downstream build process invoked once per identity.
///
/// The runner writes its artifacts into `staging_dir`, a private directory
/// owned by this invocation; the orchestrator relocates it into the
/// identity's namespace only on success.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Run one isolated build.
    ///
    /// # Errors
    ///
    /// - `Launch` when the build process cannot be started
    /// - `Failed` when it completes with a non-zero status
    async fn run(&self, context: &BuildContext, staging_dir: &Path) -> Result<(), BuildError>;
}
