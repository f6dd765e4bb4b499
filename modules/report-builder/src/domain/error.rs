//! Errors of the build orchestrator.

use thiserror::Error;

/// Domain-specific errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The configured single-identity restriction names a user that is not
    /// in the resolution report.
    #[error("user not found in resolution report: {user_id}")]
    UnknownUser { user_id: String },

    /// Every attempted identity build failed.
    #[error("all {failed} identity builds failed")]
    AllBuildsFailed { failed: usize },

    /// The output root could not be prepared.
    #[error("output directory error: {0}")]
    OutputDir(#[source] std::io::Error),
}

impl DomainError {
    #[must_use]
    pub fn unknown_user(user_id: impl Into<String>) -> Self {
        Self::UnknownUser {
            user_id: user_id.into(),
        }
    }
}
