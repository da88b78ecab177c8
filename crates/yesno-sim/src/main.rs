//! Yes/No AMM scenario runner - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Run a scripted prediction-market scenario and print the resulting state
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file path
    #[arg(short, long, env = "YESNO_CONFIG", default_value = "config/default.toml")]
    config: String,

    /// Print Prometheus metrics after the report
    #[arg(long)]
    metrics: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = yesno_sim::SimConfig::from_file(&args.config)?;
    yesno_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting yesno-sim v{}", env!("CARGO_PKG_VERSION"));
    info!(config_path = %args.config, fee_bps = %config.fee_bps, "Configuration loaded");

    let sim = yesno_sim::Simulator::new(config)?;
    let report = sim.run()?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.metrics {
        println!("{}", yesno_telemetry::Metrics::render()?);
    }

    Ok(())
}
