//! Build orchestrator service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use access_resolver::{AccessReport, UserAccess};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ReportBuilderConfig;

use super::error::DomainError;
use super::runner::{BuildContext, BuildRunner};

/// Build state of one identity.
///
/// `Pending → Building → {Succeeded, Failed}`; terminal states are
/// independent per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Pending,
    Building,
    Succeeded,
    Failed,
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One identity whose build reached the `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBuild {
    pub user_id: String,
    pub reason: String,
}

/// Outcome of one orchestration run.
///
/// A non-empty failure list is a reported summary, not an error; the run
/// only fails as a whole when every attempted identity failed.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedBuild>,
    /// Identities never started because the run was cancelled.
    pub skipped: Vec<String>,
}

enum TaskOutcome {
    Succeeded(String),
    Failed(String, String),
    Skipped(String),
}

/// Per-identity build orchestrator.
///
/// Sequential driver by default; `build_workers` bounds how many identity
/// builds run in parallel. Each build is a self-contained pipeline over an
/// immutable snapshot of that identity's accessibility set; no shared
/// mutable state exists between builders, and a single identity is never
/// built twice in one run.
pub struct Service {
    runner: Arc<dyn BuildRunner>,
    config: ReportBuilderConfig,
}

impl Service {
    #[must_use]
    pub fn new(runner: Arc<dyn BuildRunner>, config: ReportBuilderConfig) -> Self {
        Self { runner, config }
    }

    /// Namespace receiving one identity's artifacts: a deterministic
    /// function of the identity's stable id, so namespaces never collide.
    #[must_use]
    pub fn namespace_dir(output_dir: &Path, user_id: &str) -> PathBuf {
        output_dir.join(format!("user-{user_id}"))
    }

    /// Build every identity of the report (or the configured single
    /// identity), one isolated build each.
    ///
    /// # Errors
    ///
    /// - `UnknownUser` when the single-identity restriction names a user
    ///   absent from the report
    /// - `OutputDir` when the output root cannot be prepared
    /// - `AllBuildsFailed` when at least one identity was attempted and
    ///   none succeeded
    #[instrument(skip_all, fields(identities = report.users.len()))]
    pub async fn build_all(
        &self,
        report: &AccessReport,
        cancel: &CancellationToken,
    ) -> Result<BuildSummary, DomainError> {
        let targets: Vec<UserAccess> = match &self.config.only_user {
            Some(user_id) => vec![
                report
                    .user(user_id)
                    .ok_or_else(|| DomainError::unknown_user(user_id.clone()))?
                    .clone(),
            ],
            None => report.users.values().cloned().collect(),
        };

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(DomainError::OutputDir)?;

        info!(
            identities = targets.len(),
            workers = self.config.build_workers.max(1),
            output_dir = %self.config.output_dir.display(),
            "Starting per-identity builds"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.build_workers.max(1)));
        let mut tasks = JoinSet::new();
        for access in targets {
            let runner = Arc::clone(&self.runner);
            let output_dir = self.config.output_dir.clone();
            let cancel = cancel.clone();
            let semaphore = Arc::clone(&semaphore);
            debug!(
                user_id = %access.user_id,
                state = %BuildState::Pending,
                "Identity queued"
            );
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return TaskOutcome::Skipped(access.user_id);
                };
                if cancel.is_cancelled() {
                    return TaskOutcome::Skipped(access.user_id);
                }
                build_one(runner.as_ref(), &output_dir, &access).await
            });
        }

        let mut summary = BuildSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Succeeded(user_id)) => summary.succeeded.push(user_id),
                Ok(TaskOutcome::Failed(user_id, reason)) => {
                    summary.failed.push(FailedBuild { user_id, reason });
                }
                Ok(TaskOutcome::Skipped(user_id)) => summary.skipped.push(user_id),
                Err(join_error) => {
                    error!(error = %join_error, "Build task aborted");
                }
            }
        }

        // JoinSet completion order is arbitrary; keep the summary stable.
        summary.succeeded.sort();
        summary.skipped.sort();
        summary.failed.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped.len(),
            "Per-identity builds finished"
        );

        let attempted = summary.succeeded.len() + summary.failed.len();
        if attempted > 0 && summary.succeeded.is_empty() {
            return Err(DomainError::AllBuildsFailed {
                failed: summary.failed.len(),
            });
        }
        Ok(summary)
    }
}

/// Drive one identity through `Pending → Building → {Succeeded, Failed}`.
///
/// Artifacts are staged into a private directory and renamed into the
/// identity's namespace only on success, so a namespace either exists fully
/// or not at all. A failed build leaves nothing that could be mistaken for
/// a successful one.
async fn build_one(runner: &dyn BuildRunner, output_dir: &Path, access: &UserAccess) -> TaskOutcome {
    let user_id = access.user_id.clone();
    let context = BuildContext {
        user_id: user_id.clone(),
        user_name: access.user_name.clone(),
        account_ids: access.accounts.iter().cloned().collect(),
    };
    let staging_dir = output_dir.join(format!(".staging-{user_id}"));

    info!(
        user_id = %user_id,
        user_name = %context.user_name,
        accessible_accounts = context.account_ids.len(),
        state = %BuildState::Building,
        "Building identity report"
    );

    if let Err(io_error) = tokio::fs::create_dir_all(&staging_dir).await {
        error!(user_id = %user_id, error = %io_error, "Could not create staging directory");
        return TaskOutcome::Failed(user_id, io_error.to_string());
    }

    match runner.run(&context, &staging_dir).await {
        Ok(()) => {
            let namespace = Service::namespace_dir(output_dir, &user_id);
            match promote(&staging_dir, &namespace).await {
                Ok(()) => {
                    info!(
                        user_id = %user_id,
                        namespace = %namespace.display(),
                        state = %BuildState::Succeeded,
                        "Identity build succeeded"
                    );
                    TaskOutcome::Succeeded(user_id)
                }
                Err(io_error) => {
                    error!(user_id = %user_id, error = %io_error, "Could not promote artifacts");
                    discard(&staging_dir).await;
                    TaskOutcome::Failed(user_id, io_error.to_string())
                }
            }
        }
        Err(build_error) => {
            warn!(
                user_id = %user_id,
                error = %build_error,
                state = %BuildState::Failed,
                "Identity build failed, continuing with remaining identities"
            );
            discard(&staging_dir).await;
            TaskOutcome::Failed(user_id, build_error.to_string())
        }
    }
}

/// Replace any namespace left over from an earlier run, then rename the
/// staging directory into place.
async fn promote(staging_dir: &Path, namespace: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(namespace).await {
        Ok(()) => {}
        Err(io_error) if io_error.kind() == std::io::ErrorKind::NotFound => {}
        Err(io_error) => return Err(io_error),
    }
    tokio::fs::rename(staging_dir, namespace).await
}

async fn discard(staging_dir: &Path) {
    if let Err(io_error) = tokio::fs::remove_dir_all(staging_dir).await
        && io_error.kind() != std::io::ErrorKind::NotFound
    {
        warn!(staging_dir = %staging_dir.display(), error = %io_error, "Could not remove staging directory");
    }
}
