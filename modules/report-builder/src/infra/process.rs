//! Build runner backed by an external process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::ReportBuilderConfig;
use crate::domain::runner::{BuildContext, BuildError, BuildRunner};

/// Invokes the configured build command once per identity.
///
/// The identity's scope is passed through the environment:
/// `REPORT_USER_ID`, `REPORT_USER_NAME`, `REPORT_USER_ACCOUNTS`
/// (comma-separated account ids) and `REPORT_OUTPUT_DIR` pointing at the
/// staging directory the process must write into.
pub struct ProcessBuildRunner {
    command: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
}

impl ProcessBuildRunner {
    #[must_use]
    pub fn new(config: &ReportBuilderConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            workdir: config.workdir.clone(),
        }
    }
}

#[async_trait]
impl BuildRunner for ProcessBuildRunner {
    async fn run(&self, context: &BuildContext, staging_dir: &Path) -> Result<(), BuildError> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .env("REPORT_USER_ID", &context.user_id)
            .env("REPORT_USER_NAME", &context.user_name)
            .env("REPORT_USER_ACCOUNTS", context.account_ids.join(","))
            .env("REPORT_OUTPUT_DIR", staging_dir);
        if let Some(workdir) = &self.workdir {
            command.current_dir(workdir);
        }

        debug!(
            command = %self.command,
            user_id = %context.user_id,
            "Launching build process"
        );

        let status = command.status().await.map_err(BuildError::Launch)?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::Failed { status })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn context() -> BuildContext {
        BuildContext {
            user_id: "u-1".to_owned(),
            user_name: "alice".to_owned(),
            account_ids: vec!["111111111111".to_owned(), "222222222222".to_owned()],
        }
    }

    fn runner(command: &str, args: &[&str]) -> ProcessBuildRunner {
        ProcessBuildRunner::new(&ReportBuilderConfig {
            command: command.to_owned(),
            args: args.iter().map(|&a| a.to_owned()).collect(),
            ..ReportBuilderConfig::default()
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn scope_is_passed_through_the_environment() {
        let staging = tempfile::tempdir().unwrap();
        let runner = runner(
            "/bin/sh",
            &[
                "-c",
                "printf '%s|%s|%s' \"$REPORT_USER_ID\" \"$REPORT_USER_NAME\" \
                 \"$REPORT_USER_ACCOUNTS\" > \"$REPORT_OUTPUT_DIR/scope\"",
            ],
        );

        runner.run(&context(), staging.path()).await.unwrap();

        let scope = std::fs::read_to_string(staging.path().join("scope")).unwrap();
        assert_eq!(scope, "u-1|alice|111111111111,222222222222");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_failed_build() {
        let staging = tempfile::tempdir().unwrap();
        let runner = runner("/bin/sh", &["-c", "exit 3"]);

        let error = runner.run(&context(), staging.path()).await.unwrap_err();
        assert!(matches!(error, BuildError::Failed { .. }));
    }

    #[tokio::test]
    async fn missing_command_fails_to_launch() {
        let staging = tempfile::tempdir().unwrap();
        let runner = runner("/nonexistent/build-command", &[]);

        let error = runner.run(&context(), staging.path()).await.unwrap_err();
        assert!(matches!(error, BuildError::Launch(_)));
    }
}
