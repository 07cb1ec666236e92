// # route53-ddns
//
// Points Route 53 A records at this host's current public IPv4 address.
//
// This binary is a THIN caller of `ddns_core::DdnsEngine`:
// 1. Read the configuration from flags or a JSON file
// 2. Initialize logging and the runtime
// 3. Build the IP source and the Route 53 provider once
// 4. Run exactly one reconciliation and exit
//
// Periodic execution is left to an external scheduler (systemd timer, cron).
//
// ## Usage
//
// ```bash
// route53-ddns -z Z0123456789ABCDEFGHIJ -n home.example.com. vpn.example.com. -t 120
// route53-ddns --dry-run -p home -z Z0123456789ABCDEFGHIJ -n home.example.com.
// route53-ddns -c /etc/route53-ddns/config.json
// ```
//
// ## Environment
//
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn or error (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::{DdnsEngine, ReconcileOutcome, UpdateConfig};
use ddns_ip_http::HttpIpSource;
use ddns_provider_route53::Route53Provider;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Records reconciled (or nothing to do)
/// - 1: Configuration or startup error
/// - 2: Runtime error (IP lookup or provider failure)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Run completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (network, provider, malformed address)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "route53-ddns", version, about)]
struct Args {
    /// Dry run: report changes without applying them
    #[arg(short, long)]
    dry_run: bool,

    /// TTL for created records
    #[arg(short, long, default_value_t = ddns_core::config::DEFAULT_TTL, conflicts_with = "config")]
    ttl: u32,

    /// AWS profile to use
    #[arg(short, long, conflicts_with = "config")]
    profile: Option<String>,

    /// AWS Route 53 Hosted Zone Id
    #[arg(short = 'z', long, required_unless_present = "config", conflicts_with = "config")]
    hosted_zone_id: Option<String>,

    /// Target domain record names to create records for
    #[arg(
        short = 'n',
        long,
        num_args = 1..,
        required_unless_present = "config",
        conflicts_with = "config"
    )]
    record_name: Vec<String>,

    /// JSON config file
    #[arg(short = 'c', long = "config", value_name = "JSON_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Build the update configuration from flags or the config file
    ///
    /// `--dry-run` forces a dry run even when the file says otherwise.
    fn update_config(&self) -> Result<UpdateConfig> {
        let config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => UpdateConfig::new(
                self.hosted_zone_id.clone().unwrap_or_default(),
                self.record_name.clone(),
            )
            .with_ttl(self.ttl)
            .with_profile(self.profile.clone()),
        };

        let dry_run = config.dry_run || self.dry_run;
        Ok(config.with_dry_run(dry_run))
    }
}

/// Read and validate a JSON config file
fn load_config_file(path: &Path) -> Result<UpdateConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    ddns_core::parse_config(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(log_level) = parse_log_level(&args.log_level) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            args.log_level
        );
        return DdnsExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match args.update_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Catch constraint violations before any credentials are resolved
    if let Err(e) = config.validate() {
        error!("{}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // One logical actor, strictly sequential
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(&config).await {
            Ok(outcome) => {
                report(&outcome);
                DdnsExitCode::Success
            }
            Err(e) if e.is_config() => {
                error!("{}", e);
                DdnsExitCode::ConfigError
            }
            Err(e) => {
                error!("Reconciliation failed: {}", e);
                DdnsExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build the collaborators and run one reconciliation
async fn run(config: &UpdateConfig) -> ddns_core::Result<ReconcileOutcome> {
    let provider = Route53Provider::from_profile(config.profile.as_deref()).await;
    let ip_source = HttpIpSource::new();

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider));
    engine.reconcile(config).await
}

fn report(outcome: &ReconcileOutcome) {
    match outcome {
        ReconcileOutcome::NoChangeNeeded => info!("All records are up to date"),
        ReconcileOutcome::DryRun { planned } => {
            info!("Dry run finished: {} change(s) planned", planned.len())
        }
        ReconcileOutcome::Applied { changes, receipt } => info!(
            "Updated records: {} change(s) submitted as {} ({})",
            changes.len(),
            receipt.id,
            receipt.status
        ),
    }
}
