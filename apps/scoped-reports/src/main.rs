//! Scoped Reports CLI
//!
//! Resolves, for each identity in the organization, the set of accounts it
//! may see, then uses that resolution to scope record queries and to drive
//! one isolated report build per identity.
//!
//! ```yaml
//! directory:
//!   snapshot: "fixtures/directory.json"
//! resolver:
//!   assignment_concurrency: 8
//! builder:
//!   command: "npm"
//!   args: ["run", "build"]
//!   output_dir: "build-users"
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use access_resolver::{AccessReport, RecordFilter, Service as ResolverService};
use anyhow::Context;
use clap::{Parser, Subcommand};
use directory_sdk::{
    AmbientCredentials, AssignmentDirectoryClient, CredentialsProvider, IdentityDirectoryClient,
    OrganizationDirectoryClient, SearchClient,
};
use report_builder::{ProcessBuildRunner, Service as BuilderService};
use static_directory::SnapshotDirectory;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "scoped-reports")]
#[command(version, about = "Per-identity scoped report resolution and builds")]
struct Cli {
    /// Path to the YAML configuration file (default: scoped-reports.yaml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every identity's accessibility set and emit the report
    Resolve {
        /// Write the report to this path instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Search records and scope the results to one identity
    Query {
        /// Identity whose accessibility set scopes the results
        #[arg(long)]
        user: String,

        /// Search query
        query: String,

        /// Maximum number of records fetched before filtering
        #[arg(long, default_value_t = 100)]
        size: usize,
    },

    /// Run one isolated, scoped build per identity
    Build,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    run(cli.command, &config).await
}

async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    let directory = Arc::new(
        SnapshotDirectory::from_config(&config.directory)
            .context("loading directory snapshot")?,
    );

    // The provider is selected once; a failed exchange aborts the run before
    // any directory call.
    let provider: Arc<dyn CredentialsProvider> = if config.directory.role_ref.is_some() {
        Arc::clone(&directory) as Arc<dyn CredentialsProvider>
    } else {
        Arc::new(AmbientCredentials)
    };
    match provider
        .scoped_credentials()
        .await
        .context("credential exchange")?
    {
        Some(credentials) => info!(
            access_key_id = %credentials.access_key_id,
            "Using scoped administrative credentials"
        ),
        None => info!("Using ambient credentials"),
    }

    let resolver = ResolverService::new(
        Arc::clone(&directory) as Arc<dyn IdentityDirectoryClient>,
        Arc::clone(&directory) as Arc<dyn OrganizationDirectoryClient>,
        Arc::clone(&directory) as Arc<dyn AssignmentDirectoryClient>,
        config.resolver.clone(),
    );

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing in-flight work");
                cancel.cancel();
            }
        });
    }

    match command {
        Command::Resolve { output } => {
            let report = resolver.resolve(&cancel).await?;
            log_run_summary(&report);
            let rendered = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing report to {}", path.display()))?;
                    info!(path = %path.display(), "Report written");
                }
                None => println!("{rendered}"),
            }
        }

        Command::Query { user, query, size } => {
            let report = resolver.resolve(&cancel).await?;
            log_run_summary(&report);
            let access = report
                .user(&user)
                .with_context(|| format!("user {user} not found in resolution report"))?;

            let field = config.resolver.record_account_field.clone();
            let filter = match &config.resolver.allowed_accounts {
                Some(allowed) => RecordFilter::from_allowlist(allowed.iter().cloned(), field),
                None => RecordFilter::scoped(access.accounts.clone(), field),
            };

            let records = directory.search(&query, size).await.context("search")?;
            let matching = filter.apply(records);
            info!(
                user_id = %user,
                records = matching.len(),
                "Scoped query finished"
            );
            println!("{}", serde_json::to_string_pretty(&matching)?);
        }

        Command::Build => {
            config.validate_for_build()?;
            let report = resolver.resolve(&cancel).await?;
            log_run_summary(&report);

            let runner = Arc::new(ProcessBuildRunner::new(&config.builder));
            let builder = BuilderService::new(runner, config.builder.clone());
            let summary = builder.build_all(&report, &cancel).await?;

            for failure in &summary.failed {
                warn!(
                    user_id = %failure.user_id,
                    reason = %failure.reason,
                    "Identity build failed"
                );
            }
            info!(
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                skipped = summary.skipped.len(),
                "Build run finished"
            );
        }
    }

    Ok(())
}

fn log_run_summary(report: &AccessReport) {
    info!(
        users = report.users.len(),
        skipped_pairs = report.skipped_pairs,
        failed_membership_lookups = report.failed_membership_lookups,
        "Resolution finished"
    );
}
