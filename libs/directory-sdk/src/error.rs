//! Error type shared by every directory client.

use thiserror::Error;

/// Errors returned by directory clients.
///
/// Per-pair lookup calls (`list_assignments`, `list_groups_of_user`) are
/// recovered by callers: `NotFound` means "no data" and any other failure
/// fails soft to an empty result. Directory-level listing failures and
/// credential-exchange failures propagate and abort the run.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The requested entity does not exist or the caller has lost access to
    /// it. Indistinguishable from "no data" and treated identically.
    #[error("not found: {0}")]
    NotFound(String),

    /// The directory could not be reached or returned a transient failure.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The directory answered with something the client could not decode.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Exchanging credentials for the administrative scope failed.
    ///
    /// Fatal for the whole run; no resolution is meaningful without the
    /// correct scope.
    #[error("credential exchange failed: {0}")]
    CredentialExchange(String),
}

impl DirectoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse(reason.into())
    }

    pub fn credential_exchange(reason: impl Into<String>) -> Self {
        Self::CredentialExchange(reason.into())
    }

    /// Whether a per-pair lookup may recover from this error by treating the
    /// result as empty.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CredentialExchange(_))
    }
}
