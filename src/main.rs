//! Aave v3 multichain position scanner.
//!
//! Looks up one account's `getUserAccountData` on every configured chain and
//! prints collateral, debt, and liquidation risk per chain plus totals.

mod logging;
mod render;
mod signal;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use sentinel_chain::{parse_account, HttpTransport};
use sentinel_core::{PositionResolver, ScanCancel, SentinelConfig};

#[derive(Parser, Debug)]
#[command(name = "aave-sentinel", version, about = "Scan Aave v3 positions across EVM chains")]
struct Args {
    /// Account address (0x-prefixed, 40 hex digits)
    address: String,

    /// TOML config file. Falls back to $SENTINEL_CONFIG, then built-in chains.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only scan these chains (repeatable, case-insensitive)
    #[arg(long = "chain", value_name = "NAME")]
    chains: Vec<String>,

    /// Per-endpoint timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Chains scanned at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Print the scan result as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(args.json_logs);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Scan aborted");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let account = parse_account(&args.address)
        .with_context(|| format!("invalid Ethereum address `{}`", args.address))?;
    let config = load_config(&args)?;
    config.scan.log_config();

    let resolver = PositionResolver::from_config(&config, Arc::new(HttpTransport::new()));

    let cancel = ScanCancel::new();
    signal::spawn_interrupt_handler(cancel.clone());

    if !args.json {
        println!("{}", render::header(&args.address));
    }

    let result = resolver.scan(&args.address, &cancel).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{json}");
    } else {
        print!("{}", render::report(&result, &args.address));
    }

    info!(account = %account, status = ?result.status, "Done");
    Ok(())
}

/// Load config and apply command-line overrides.
fn load_config(args: &Args) -> Result<SentinelConfig> {
    let mut config =
        SentinelConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    if !args.chains.is_empty() {
        config.chains = config.chains.filter(&args.chains)?;
    }
    if let Some(secs) = args.timeout {
        config.scan.request_timeout_secs = secs;
    }
    if let Some(n) = args.concurrency {
        config.scan.max_concurrent_chains = n;
    }

    Ok(config)
}
