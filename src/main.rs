use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wildmarch::core::error::Result;
use wildmarch::scenario::{self, ScenarioConfig};

/// Seeded migration scenario runner.
#[derive(Parser, Debug)]
#[command(name = "wildmarch", version, about = "Run a seeded migration scenario")]
struct Args {
    /// Seed for the scenario's random stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of migration steps to attempt.
    #[arg(long, default_value_t = 40)]
    steps: u32,

    /// Write the final world snapshot as JSON to this path.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ScenarioConfig {
        seed: args.seed,
        steps: args.steps,
        ..Default::default()
    };
    let outcome = scenario::run(&config)?;
    println!("{}", outcome.summary());

    if let Some(path) = args.output {
        fs::write(&path, outcome.snapshot.to_json()?)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}
