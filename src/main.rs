//! Command-line interface for ffv-loader
//!
//! # Usage Examples
//!
//! ```bash
//! # Load the pairs configured in loader.yaml
//! ffv-loader --config loader.yaml
//!
//! # Same, against another server
//! CLICKHOUSE_DSN="http://ch:8123?username=default&database=biometrics" \
//!   ffv-loader --config loader.yaml
//!
//! # Validate configuration and show the batch plan
//! ffv-loader --config loader.yaml --dry-run
//! ```

use anyhow::Context;
use clap::Parser;
use clickhouse_sink::mask_dsn_password;
use ffv_loader::{BatchPlan, Config, LoadArgs};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ffv-loader")]
#[command(about = "Generate synthetic control objects and facial features vectors and bulk load them into ClickHouse")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: LoadArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let mut config = Config::from_file(&cli.args.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.args.config))?;
    cli.args.apply(&mut config);

    // Initialize tracing
    let default_filter = if config.storage.debug {
        "info,ffv_loader=debug,clickhouse_sink=debug,biometric_generator=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if cli.args.dry_run {
        let dsn = cli.args.dsn(&config);
        config.validate()?;
        let plan = BatchPlan::new(config.generator.n, config.generator.in_iter)?;
        tracing::info!("[DRY-RUN] Would load {} pairs into ClickHouse", plan.total);
        tracing::info!("[DRY-RUN] Connection: {}", mask_dsn_password(&dsn));
        tracing::info!(
            "[DRY-RUN] Batches: {} x {} + {}",
            plan.full_batches,
            plan.batch_size,
            plan.remainder
        );
        tracing::info!("[DRY-RUN] Configuration validated successfully");
        return Ok(());
    }

    let summary = ffv_loader::run(&config, cli.args.dsn.as_deref(), started)
        .await
        .context("Load failed")?;

    println!("{summary}");
    Ok(())
}
