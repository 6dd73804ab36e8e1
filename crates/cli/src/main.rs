//! Upload, activate and list revisions stored in a KV store.

mod config;
mod reporter;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kvdeploy_core::config::{ActivationConfig, AppConfig, StoreConfig};
use kvdeploy_registry::{Deployer, RevisionRegistry};
use reporter::StdoutReporter;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kvdeploy")]
#[command(about = "Upload and activate revisions in a KV store")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(
        long,
        env = "KVDEPLOY_CONFIG",
        default_value = "kvdeploy.toml",
        global = true
    )]
    config: PathBuf,

    /// Namespace to operate on (overrides config)
    #[arg(long, short = 'n', global = true)]
    namespace: Option<String>,

    /// Use a throwaway in-memory store instead of the configured one
    #[arg(long, global = true, default_value_t = false)]
    memory: bool,

    /// Log debug output, including per-step progress
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an artifact as a new revision
    Upload(UploadArgs),
    /// Mark a recent revision as active
    Activate {
        /// Revision key to activate (overrides config)
        revision: Option<String>,
    },
    /// List recent revisions, newest first
    List {
        /// Print JSON instead of one line per revision
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct UploadArgs {
    /// Revision key (overrides config)
    #[arg(long, short = 'r')]
    revision: Option<String>,

    /// Artifact file; defaults to <dist-dir>/<file-pattern>
    #[arg(long)]
    file: Option<PathBuf>,

    /// Directory holding the build output
    #[arg(long)]
    dist_dir: Option<PathBuf>,

    /// File name within the build output directory
    #[arg(long)]
    file_pattern: Option<String>,

    /// Replace an existing revision with the same key
    #[arg(long, default_value_t = false)]
    allow_overwrite: bool,

    /// Number of revisions to keep
    #[arg(long)]
    max_revisions: Option<usize>,

    /// Alias to point at the revision (repeatable)
    #[arg(long = "alias")]
    aliases: Vec<String>,

    /// Metadata entry as key=value (repeatable)
    #[arg(long = "metadata", value_parser = config::parse_metadata)]
    metadata: Vec<(String, Value)>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut app = config::load(&cli.config)?;
    if let Some(namespace) = cli.namespace {
        app.registry.namespace = namespace;
    }
    if cli.memory {
        app.store = StoreConfig::Memory;
    }

    let deployer = build_deployer(&app, cli.verbose).await?;

    match cli.command {
        Commands::Upload(args) => handle_upload(&deployer, app, args).await,
        Commands::Activate { revision } => handle_activate(&deployer, app, revision).await,
        Commands::List { json } => handle_list(&deployer, json).await,
    }
}

async fn build_deployer(app: &AppConfig, verbose: bool) -> Result<Deployer> {
    let store =
        kvdeploy_storage::from_config(&app.store).context("failed to initialize KV store")?;
    tracing::debug!(
        backend = store.backend_name(),
        namespace = %app.registry.namespace,
        "Using KV store"
    );

    store
        .health_check()
        .await
        .context("KV store health check failed")?;
    tracing::debug!(backend = store.backend_name(), "KV store reachable");

    let registry = RevisionRegistry::new(store, &app.registry)?;
    Ok(Deployer::new(registry).with_reporter(Arc::new(StdoutReporter::new(verbose))))
}

async fn handle_upload(deployer: &Deployer, app: AppConfig, args: UploadArgs) -> Result<()> {
    let mut upload = app.upload;
    if let Some(revision) = args.revision {
        upload.revision_key = revision;
    }
    if let Some(file) = args.file {
        upload.file_path = Some(file);
    }
    if let Some(dist_dir) = args.dist_dir {
        upload.dist_dir = dist_dir;
    }
    if let Some(file_pattern) = args.file_pattern {
        upload.file_pattern = file_pattern;
    }
    if let Some(max_revisions) = args.max_revisions {
        upload.max_revisions = max_revisions;
    }
    upload.allow_overwrite |= args.allow_overwrite;
    upload.aliases.extend(args.aliases);
    upload.metadata.extend(args.metadata);

    let outcome = deployer.upload(&upload).await?;
    tracing::debug!(
        revision_key = %outcome.revision_key,
        inserted = outcome.inserted,
        removed = ?outcome.removed,
        "Upload finished"
    );
    Ok(())
}

async fn handle_activate(
    deployer: &Deployer,
    app: AppConfig,
    revision: Option<String>,
) -> Result<()> {
    let activation = match revision {
        Some(revision) => ActivationConfig::for_revision(revision),
        None => app.activation,
    };

    deployer.activate(&activation).await?;
    Ok(())
}

async fn handle_list(deployer: &Deployer, json: bool) -> Result<()> {
    let revisions = deployer.fetch_revisions().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&revisions)?);
        return Ok(());
    }

    if revisions.is_empty() {
        println!(
            "No revisions in namespace `{}`",
            deployer.registry().namespace()
        );
    }
    for summary in revisions {
        let marker = if summary.active { "*" } else { " " };
        println!("{marker} {}", summary.revision);
    }
    Ok(())
}
