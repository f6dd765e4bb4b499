//! Configuration for the static directory plugin.

use std::path::PathBuf;

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDirectoryConfig {
    /// Path to the JSON snapshot file.
    pub snapshot: PathBuf,

    /// Reference to the administrative scope.
    ///
    /// When set, the snapshot must carry credentials; the provider returns
    /// them as the scoped identity. When unset, the caller's ambient identity
    /// is used.
    pub role_ref: Option<String>,
}
