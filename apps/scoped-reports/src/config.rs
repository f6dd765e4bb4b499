//! Application configuration.
//!
//! Merged from two sources, later ones winning:
//!
//! 1. YAML configuration file (`--config`, default `scoped-reports.yaml`)
//! 2. `SCOPED_REPORTS_`-prefixed environment variables, nested sections
//!    separated by `__` (e.g. `SCOPED_REPORTS_RESOLVER__ASSIGNMENT_CONCURRENCY`)

use std::path::Path;

use access_resolver::AccessResolverConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use report_builder::ReportBuilderConfig;
use serde::Deserialize;
use static_directory::StaticDirectoryConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory snapshot and administrative scope.
    pub directory: StaticDirectoryConfig,

    /// Access resolution engine.
    pub resolver: AccessResolverConfig,

    /// Per-identity build orchestration.
    pub builder: ReportBuilderConfig,
}

impl AppConfig {
    /// Load and validate the configuration.
    ///
    /// An explicitly named file must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or malformed sources, unknown fields, or missing
    /// required values. All of this is reported before any directory call.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let figment = match path {
            Some(path) => Figment::from(Yaml::file_exact(path)),
            None => Figment::from(Yaml::file("scoped-reports.yaml")),
        };
        let config: Self = figment
            .merge(Env::prefixed("SCOPED_REPORTS_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.directory.snapshot.as_os_str().is_empty(),
            "directory.snapshot is required"
        );
        Ok(())
    }

    /// Extra requirements of the `build` command.
    ///
    /// # Errors
    ///
    /// Fails when no build command is configured.
    pub fn validate_for_build(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.builder.command.is_empty(),
            "builder.command is required for build"
        );
        Ok(())
    }
}
