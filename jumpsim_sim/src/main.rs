//! jumpsim CLI
//!
//! Run long-horizon validation scenarios for the jump-process engine.

use clap::Parser;
use jumpsim_env::OsEntropy;
use jumpsim_sim::{ScenarioId, ScenarioResult, ScenarioRunner, SimConfig, SimWorld};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Frames written by `--export`.
const EXPORT_FRAMES: usize = 10_000;

/// jumpsim long-run validation CLI
#[derive(Parser, Debug)]
#[command(name = "jumpsim")]
#[command(about = "Check simulated jump processes against their stationary laws", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (fixed_step, random_batches, time_weighted, noisy_reporting, queue_occupancy, queue_idle, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Simulated time per path
    #[arg(short, long, default_value = "5000")]
    duration: f64,

    /// Query step (mean step for random batches)
    #[arg(long, default_value = "0.1")]
    step: f64,

    /// Independent paths per scenario
    #[arg(short, long, default_value = "4")]
    paths: usize,

    /// Maximum relative error against theory
    #[arg(short, long, default_value = "0.03")]
    tolerance: f64,

    /// Draw every path from OS entropy instead of the seed
    #[arg(long)]
    unseeded: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the first path of the scenario to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("jumpsim validation runner v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: fixed_step, random_batches, time_weighted, noisy_reporting, queue_occupancy, queue_idle, all");
            std::process::exit(1);
        })]
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let config_for = |seed: u64| SimConfig {
        seed,
        duration: args.duration,
        step: args.step,
        paths: args.paths,
        tolerance: args.tolerance,
        ..Default::default()
    };
    let world_for = |seed: u64| {
        if args.unseeded {
            SimWorld::with_entropy(config_for(seed), Arc::new(OsEntropy::new()))
        } else {
            SimWorld::new(config_for(seed))
        }
    };

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            eprintln!("Error: --export only supports a single scenario, not 'all'");
            std::process::exit(1);
        }

        let runner = ScenarioRunner::from_world(world_for(base_seed));
        let written = runner
            .export_trajectory(scenarios[0], EXPORT_FRAMES)
            .and_then(|export| {
                export
                    .write_to_file(export_path)
                    .map(|_| export.frames.len())
                    .map_err(|e| jumpsim_sim::RunError::Export(e.to_string()))
            });

        match written {
            Ok(frames) => info!("Exported {} frames of {} to {}", frames, scenarios[0], export_path),
            Err(e) => {
                error!("Failed to export {}: {}", scenarios[0], e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Run scenarios
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::from_world(world_for(seed));

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", scenario.name(), result.seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        result.seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to encode results: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
