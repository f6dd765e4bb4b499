//! Access Resolution Engine
//!
//! Resolves, for every user in the organization, the de-duplicated set of
//! accounts reachable either through a direct assignment or through any
//! group the user belongs to, across every permission set that exists.
//!
//! The resolved [`AccessReport`] is consumed both by the per-identity record
//! filter and by the report-builder orchestrator.
//!
//! [`AccessReport`]: domain::model::AccessReport

pub mod config;
pub mod domain;

pub use config::{AccessResolverConfig, GroupNesting};
pub use domain::filter::RecordFilter;
pub use domain::model::{AccessReport, AccessibilitySet, UserAccess};
pub use domain::resolver::Service;
