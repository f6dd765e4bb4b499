//! Errors of the access resolution engine.

use directory_sdk::DirectoryError;
use thiserror::Error;

/// Domain-specific errors.
///
/// Only failures that threaten correctness of the whole run surface here;
/// per-pair and per-user lookup failures are recovered inside the engine and
/// reported through the run counters instead.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A directory-level listing (users, accounts, policies) failed.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}
