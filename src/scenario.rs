use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{ConfigError, SimError},
    feature::FeatureSet,
    language::Language,
    systems::ScheduleOrder,
    topology::GridPos,
    transmission::{TransmissionModel, TransmissionParams},
    world::World,
};

fn default_snapshot_interval_ticks() -> u64 {
    0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_census_interval() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub schedule: ScheduleOrder,
    pub world: WorldConfig,
    pub culture: CultureConfig,
    pub transmission: TransmissionParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub initial_num_agents: u64,
    /// Initial share of X speakers, in percent.
    #[serde(default)]
    pub percent_x: u32,
    #[serde(default)]
    pub percent_y: u32,
}

impl WorldConfig {
    /// Percentage seeding applies only when both shares are strictly inside
    /// (0, 100); otherwise every cell gets an agent of random language.
    pub fn uses_percent_seeding(&self) -> bool {
        (1..100).contains(&self.percent_x) && (1..100).contains(&self.percent_y)
    }

    /// Agent counts for X, Y and XY under percentage seeding.
    pub fn group_sizes(&self) -> [(Language, u64); 3] {
        let n = self.initial_num_agents;
        let x = n * self.percent_x as u64 / 100;
        let y = n * self.percent_y as u64 / 100;
        [
            (Language::X, x),
            (Language::Y, y),
            (Language::XY, n.saturating_sub(x + y)),
        ]
    }

    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CultureConfig {
    /// Length of every feature set, language slot included.
    pub num_features: usize,
    pub num_feature_traits: u32,
    /// Flip a coin for each cultural trait's activity instead of activating
    /// all of them. Accepts a boolean or an integer, where 0 means off.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub random_features: bool,
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Ticks between census log lines; 0 silences them.
    #[serde(default = "default_census_interval")]
    pub census_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            census_interval_ticks: default_census_interval(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Reads, parses and validates a scenario file.
    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 {
            return Err(ConfigError::invalid(
                "world",
                format!("grid must be non-empty, got {}x{}", world.width, world.height),
            ));
        }
        if world.uses_percent_seeding() {
            if world.percent_x + world.percent_y > 100 {
                return Err(ConfigError::invalid(
                    "world.percent_x/percent_y",
                    format!(
                        "shares add up to {}%",
                        world.percent_x + world.percent_y
                    ),
                ));
            }
            if world.initial_num_agents == 0 {
                return Err(ConfigError::invalid(
                    "world.initial_num_agents",
                    "percentage seeding needs at least one agent",
                ));
            }
            if world.initial_num_agents > world.cell_count() {
                return Err(ConfigError::Overcrowded {
                    agents: world.initial_num_agents,
                    width: world.width,
                    height: world.height,
                });
            }
        }

        if self.culture.num_features == 0 {
            return Err(ConfigError::invalid(
                "culture.num_features",
                "the language feature is always present",
            ));
        }
        if self.culture.num_feature_traits == 0 {
            return Err(ConfigError::invalid(
                "culture.num_feature_traits",
                "traits need at least one variant",
            ));
        }

        let t = &self.transmission;
        check_unit("transmission.status_x", t.status_x)?;
        check_unit("transmission.c_xy_to_x", t.c_xy_to_x)?;
        check_unit("transmission.c_xy_to_y", t.c_xy_to_y)?;
        check_unit("transmission.c_x_to_xy", t.c_x_to_xy)?;
        check_unit("transmission.c_y_to_xy", t.c_y_to_xy)?;
        if !(t.volatility.is_finite() && t.volatility >= 0.0) {
            return Err(ConfigError::invalid(
                "transmission.volatility",
                format!("expected a finite value >= 0, got {}", t.volatility),
            ));
        }
        if !(t.mortality_rate > 0.0 && t.mortality_rate <= 1000.0) {
            return Err(ConfigError::invalid(
                "transmission.mortality_rate",
                format!("expected per-mille rate in (0, 1000], got {}", t.mortality_rate),
            ));
        }
        Ok(())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(100)
    }

    /// Places the initial population and draws its traits.
    pub fn build_world<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<World, SimError> {
        let mut world = World::new(
            self.world.width,
            self.world.height,
            TransmissionModel::new(self.transmission),
        );
        if self.world.uses_percent_seeding() {
            let mut free = world.grid().free_positions();
            free.shuffle(rng);
            let mut cells = free.into_iter();
            for (language, count) in self.world.group_sizes() {
                for _ in 0..count {
                    let pos = cells.next().ok_or(SimError::GridFull)?;
                    self.spawn(&mut world, language, pos, rng)?;
                }
            }
        } else {
            let positions: Vec<GridPos> = world.grid().positions().collect();
            for pos in positions {
                let language = Language::random(rng);
                self.spawn(&mut world, language, pos, rng)?;
            }
        }
        Ok(world)
    }

    fn spawn<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        language: Language,
        pos: GridPos,
        rng: &mut R,
    ) -> Result<(), SimError> {
        let features = FeatureSet::random(
            language,
            self.culture.num_features,
            self.culture.num_feature_traits,
            self.culture.random_features,
            rng,
        );
        world.spawn(features, pos)?;
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("expected a value in [0, 1], got {value}"),
        ))
    }
}
