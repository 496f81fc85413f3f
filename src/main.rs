use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use langdiff::{
    engine::{EngineBuilder, EngineSettings},
    rng::{RngManager, PLACEMENT_STREAM},
    scenario::ScenarioLoader,
    systems::{ConsistencySystem, InteractionSystem, ScheduleOrder},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Language competition and cultural diffusion on a torus")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/default.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override agent order within a tick
    #[arg(long, value_enum)]
    schedule: Option<ScheduleOrder>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (defaults to the scenario's level)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let seed = cli.seed.unwrap_or(scenario.seed);
    let ticks = scenario.ticks(cli.ticks);
    let schedule = cli.schedule.unwrap_or(scenario.schedule);

    let mut setup_rng = RngManager::new(seed);
    let mut world = scenario.build_world(&mut setup_rng.stream(PLACEMENT_STREAM))?;

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed,
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
        census_interval_ticks: scenario.logging.census_interval_ticks,
    };

    let mut engine = EngineBuilder::new(settings)
        .with_system(InteractionSystem::new(schedule))
        .with_system(ConsistencySystem::new(scenario.culture.num_features))
        .build();

    engine.run(&mut world, ticks)?;
    let census = world.census();
    println!(
        "Scenario '{}' completed for {} ticks. Speakers X: {}, Y: {}, XY: {}. Mean similarity: {:.4}",
        scenario.name,
        ticks,
        census.x,
        census.y,
        census.xy,
        world.layer().mean()
    );
    Ok(())
}
