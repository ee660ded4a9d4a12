//! Idleworks command-line runner.
//!
//! Loads a scenario (or the stock game), runs it with optional wall-clock
//! pacing, and prints collections, finished actions and the final status.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use idleworks_core::clock::SleepPacing;
use idleworks_core::engine::Engine;
use idleworks_core::event::{Event, EventKind};
use idleworks_core::fixed::fixed64_to_f64;
use idleworks_core::sim::RunOutcome;
use idleworks_data::Scenario;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idleworks")]
#[command(about = "Run an idle factory production simulation")]
struct Cli {
    /// Scenario file (.ron, .toml or .json). Defaults to the stock game.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the number of simulated minutes
    #[arg(short, long)]
    minutes: Option<u64>,

    /// Override wall-clock milliseconds per simulated minute (0 disables pacing)
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Log filter, e.g. "info" or "idleworks_core=debug"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print collections, completed actions and the goal banner as they happen.
fn attach_printers(engine: &mut Engine) {
    let registry = engine.registry().clone();
    engine.on_event(
        EventKind::MaterialCollected,
        Box::new(move |event| {
            if let Event::MaterialCollected {
                material, amount, ..
            } = event
            {
                println!(
                    "Collected {:.3} units of {}",
                    fixed64_to_f64(*amount),
                    registry.name(*material)
                );
            }
        }),
    );
    engine.on_event(
        EventKind::ActionCompleted,
        Box::new(|event| {
            if let Event::ActionCompleted { description, .. } = event {
                println!("Action complete: {description}");
            }
        }),
    );
    engine.on_event(
        EventKind::GoalReached,
        Box::new(|_| println!("All materials collected! Simulation complete.")),
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::default_scenario().context("stock scenario is invalid")?,
    };
    if let Some(minutes) = cli.minutes {
        scenario.minutes = minutes;
    }
    if let Some(ms) = cli.pace_ms {
        scenario.pace = Duration::from_millis(ms);
    }

    let pacer: Option<SleepPacing> = scenario.pacer();
    let (mut engine, minutes) = scenario
        .into_engine()
        .context("failed to apply opening commands")?;
    if let Some(pacer) = pacer {
        engine.set_pacer(pacer);
    }
    attach_printers(&mut engine);
    // Opening builds and upgrades are buffered until the first delivery.
    engine.flush_events();

    info!(minutes, factories = engine.factory_count(), "starting run");
    let result = engine.run(minutes);
    info!(
        ticks = result.ticks_run,
        goal = result.outcome == RunOutcome::GoalReached,
        "run finished"
    );

    println!("{}", engine.status());
    Ok(())
}
