use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    registry::SpeakerCensus,
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    world::World,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
    /// Ticks between census log lines; 0 silences them.
    pub census_interval_ticks: u64,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

/// Per-tick report handed to hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub tick: u64,
    pub census: SpeakerCensus,
    pub steps: u64,
    pub interactions: u64,
    pub language_changes: u64,
    pub traits_copied: u64,
    pub mean_similarity: f64,
    pub snapshot_path: Option<PathBuf>,
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        self.run_with_hook(world, ticks, |_| {})
    }

    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&TickSummary),
    {
        info!(
            scenario = %self.settings.scenario_name,
            seed = self.settings.seed,
            ticks,
            agents = world.agents().len(),
            "starting run"
        );
        for _ in 0..ticks {
            let summary = self.step(world)?;
            hook(&summary);
        }
        let census = world.census();
        info!(
            scenario = %self.settings.scenario_name,
            tick = world.tick(),
            x = census.x,
            y = census.y,
            xy = census.xy,
            mean_similarity = world.layer().mean(),
            "run finished"
        );
        Ok(())
    }

    /// Runs every system once and advances the clock.
    pub fn step(&mut self, world: &mut World) -> Result<TickSummary> {
        let current_tick = world.tick() + 1;
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            let ctx = SystemContext {
                tick: current_tick,
                scenario_name: &self.settings.scenario_name,
            };
            system.run(&ctx, world, &mut rng_stream)?;
        }
        world.advance_time();
        let snapshot_path = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;
        if let Some(path) = &snapshot_path {
            info!(tick = world.tick(), path = %path.display(), "snapshot written");
        }

        let stats = world.stats();
        let summary = TickSummary {
            tick: world.tick(),
            census: *world.census(),
            steps: stats.steps,
            interactions: stats.interactions,
            language_changes: stats.language_changes,
            traits_copied: stats.traits_copied,
            mean_similarity: world.layer().mean(),
            snapshot_path,
        };
        let interval = self.settings.census_interval_ticks;
        if interval != 0 && summary.tick % interval == 0 {
            debug!(
                tick = summary.tick,
                x = summary.census.x,
                y = summary.census.y,
                xy = summary.census.xy,
                interactions = summary.interactions,
                language_changes = summary.language_changes,
                mean_similarity = summary.mean_similarity,
                "census"
            );
        }
        Ok(summary)
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
