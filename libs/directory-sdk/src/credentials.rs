//! Optional credential exchange for the administrative scope.
//!
//! The directories may live behind a separate administrative scope reached
//! through a credential exchange. The provider is selected once at startup:
//! [`AmbientCredentials`] when no role reference is configured, an
//! exchange-backed implementation otherwise. Call sites never branch on it.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::DirectoryError;

/// Credentials scoped to the administrative context.
///
/// Secret material is wrapped in [`SecretString`] so it cannot leak through
/// `Debug` output or logging.
#[derive(Clone)]
pub struct ScopedCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: SecretString,
}

impl std::fmt::Debug for ScopedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Strategy for obtaining directory credentials.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Return scoped credentials, or `None` to use the caller's ambient
    /// identity.
    ///
    /// # Errors
    ///
    /// A failed exchange is fatal for the whole run.
    async fn scoped_credentials(&self) -> Result<Option<ScopedCredentials>, DirectoryError>;
}

/// Default provider: no exchange, use the caller's ambient identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientCredentials;

#[async_trait]
impl CredentialsProvider for AmbientCredentials {
    async fn scoped_credentials(&self) -> Result<Option<ScopedCredentials>, DirectoryError> {
        Ok(None)
    }
}
