//! Directory SDK
//!
//! This crate provides the contracts for every external directory the
//! resolver talks to:
//!
//! - [`IdentityDirectoryClient`] - users and group memberships
//! - [`OrganizationDirectoryClient`] - accounts (resource partitions)
//! - [`AssignmentDirectoryClient`] - permission sets and assignment listings
//! - [`SearchClient`] - the downstream record source subject to filtering
//! - [`CredentialsProvider`] - optional administrative-scope credential exchange
//! - [`DirectoryError`] - shared error type
//!
//! All clients are read-only request/response ports; implementations live in
//! plugin crates and are consumed as `Arc<dyn _>`.

pub mod api;
pub mod credentials;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::{
    AssignmentDirectoryClient, IdentityDirectoryClient, OrganizationDirectoryClient, SearchClient,
};
pub use credentials::{AmbientCredentials, CredentialsProvider, ScopedCredentials};
pub use error::DirectoryError;
pub use models::{Account, AccountId, Assignment, GroupId, PolicyId, PrincipalType, UserId, UserIdentity};
