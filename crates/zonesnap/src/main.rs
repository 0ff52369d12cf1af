// # zonesnap - hosted zone backup and restore
//
// Thin integration layer: reads configuration from the environment, builds
// the Route 53 provider and the snapshot store, and runs one operation.
// All backup and reconciliation logic lives in zonesnap-core.
//
// ## Usage
//
// ```text
// zonesnap backup
// zonesnap restore [--from TIMESTAMP] [--exclude-id ID]... [--exclude-name NAME]...
//                  [--dry-run] [--request JSON]
// ```
//
// `--request` takes the JSON restore payload
// (`{"from": .., "ids": [..], "names": [..], "dryrun": ..}`); the other flags
// are merged into it.
//
// ## Configuration
//
// ### Storage
// - `ZONESNAP_STORE_TYPE`: `s3` (default) or `file`
// - `S3_BUCKET_NAME`: destination bucket (s3 store)
// - `ZONESNAP_S3_ENDPOINT`: custom S3-compatible endpoint (optional)
// - `ZONESNAP_STORE_PATH`: root directory (file store)
//
// ### AWS
// - `REGION`: region for API clients (optional, SDK default chain otherwise)
// - Credentials come from the standard AWS provider chain
//
// ### Logging
// - `ZONESNAP_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export S3_BUCKET_NAME=dns-backups
// export REGION=us-east-1
//
// zonesnap backup
// zonesnap restore --dry-run --exclude-name example.com
// ```

use anyhow::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zonesnap_core::traits::{BlobStore, DnsProvider};
use zonesnap_core::{
    BackupService, FileBlobStore, ProviderConfig, Reconciler, RestoreRequest, SnapshotStore,
    StoreConfig, Timestamp,
};
use zonesnap_provider_route53::Route53Provider;
use zonesnap_store_s3::S3BlobStore;

/// Exit codes for different termination scenarios
///
/// - 0: Operation completed
/// - 1: Usage or configuration error
/// - 2: Operation failed
#[derive(Debug, Clone, Copy)]
enum ZonesnapExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<ZonesnapExitCode> for ExitCode {
    fn from(code: ZonesnapExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Hosted zone backup and restore
#[derive(Debug, Parser)]
#[command(name = "zonesnap")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Snapshot every hosted zone, record set and health check
    Backup,
    /// Bring live zones and health checks back in line with a backup
    Restore(RestoreArgs),
}

#[derive(Debug, Default, Args)]
struct RestoreArgs {
    /// Backup to restore (YYYY-MM-DDTHH:MM:SSZ); the latest one when omitted
    #[arg(long, value_name = "TIMESTAMP")]
    from: Option<Timestamp>,

    /// Zone Id to leave untouched (repeatable)
    #[arg(long = "exclude-id", value_name = "ID")]
    exclude_ids: Vec<String>,

    /// Zone name to leave untouched, trailing dot optional (repeatable)
    #[arg(long = "exclude-name", value_name = "NAME")]
    exclude_names: Vec<String>,

    /// Report what would change without changing it
    #[arg(long)]
    dry_run: bool,

    /// JSON restore payload; the other flags are merged into it
    #[arg(long, value_name = "JSON")]
    request: Option<String>,
}

impl RestoreArgs {
    /// Build the restore request from `--request` and the individual flags
    fn into_request(self) -> Result<RestoreRequest> {
        let mut request: RestoreRequest = match self.request {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| anyhow::anyhow!("--request is not a valid restore request: {}", e))?,
            None => RestoreRequest::default(),
        };

        if self.from.is_some() {
            request.from = self.from;
        }
        request.ids.extend(self.exclude_ids);
        request.names.extend(self.exclude_names);
        request.dryrun |= self.dry_run;

        Ok(request)
    }
}

/// Operation resolved from the command line
#[derive(Debug, PartialEq)]
enum Operation {
    Backup,
    Restore(RestoreRequest),
}

impl TryFrom<Cli> for Operation {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        match cli.command {
            Command::Backup => Ok(Operation::Backup),
            Command::Restore(args) => Ok(Operation::Restore(args.into_request()?)),
        }
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    store: StoreConfig,
    provider: ProviderConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_type = lookup("ZONESNAP_STORE_TYPE").unwrap_or_else(|| "s3".to_string());

        let store = match store_type.as_str() {
            "s3" => StoreConfig::S3 {
                bucket: lookup("S3_BUCKET_NAME").unwrap_or_default(),
                endpoint_url: lookup("ZONESNAP_S3_ENDPOINT").filter(|url| !url.is_empty()),
            },
            "file" => StoreConfig::File {
                path: lookup("ZONESNAP_STORE_PATH").unwrap_or_default(),
            },
            other => anyhow::bail!(
                "ZONESNAP_STORE_TYPE '{}' is not supported. \
                Supported types: s3, file",
                other
            ),
        };

        Ok(Self {
            store,
            provider: ProviderConfig {
                region: lookup("REGION").filter(|region| !region.is_empty()),
            },
            log_level: lookup("ZONESNAP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.store.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESNAP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ZonesnapExitCode::ConfigError.into()
            } else {
                ZonesnapExitCode::Success.into()
            };
        }
    };

    let operation = match Operation::try_from(cli) {
        Ok(operation) => operation,
        Err(e) => {
            eprintln!("{}", e);
            return ZonesnapExitCode::ConfigError.into();
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ZonesnapExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ZonesnapExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonesnapExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesnapExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(operation, config).await {
            Ok(status) => {
                println!("{}", status);
                ZonesnapExitCode::Success
            }
            Err(e) => {
                error!("{:#}", e);
                ZonesnapExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run one operation and return its status line
async fn run(operation: Operation, config: Config) -> Result<String> {
    let sdk_config = load_sdk_config(&config.provider).await;

    let blobs: Arc<dyn BlobStore> = match &config.store {
        StoreConfig::S3 { .. } => Arc::new(S3BlobStore::from_store_config(
            &sdk_config,
            &config.store,
        )?),
        StoreConfig::File { path } => Arc::new(FileBlobStore::new(path).await?),
    };
    info!("Snapshot store: {}", blobs.store_name());

    let store = SnapshotStore::new(blobs);
    let provider: Arc<dyn DnsProvider> = Arc::new(Route53Provider::from_conf(&sdk_config));

    match operation {
        Operation::Backup => {
            let summary = BackupService::new(provider, store).run().await?;
            info!(
                "Backup {} complete: {} zone(s), {} record set(s), {} health check(s)",
                summary.timestamp, summary.zones, summary.record_sets, summary.health_checks
            );
            Ok(summary.to_string())
        }
        Operation::Restore(request) => {
            let summary = Reconciler::new(provider, store).restore(&request).await?;
            info!("{}", summary);
            Ok(summary.to_string())
        }
    }
}

/// Load the shared AWS configuration once for every client
async fn load_sdk_config(provider: &ProviderConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &provider.region {
        loader = loader.region(Region::new(region.clone()));
    }

    loader.load().await
}
