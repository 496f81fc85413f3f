pub mod affinity;
pub mod agent;
pub mod diffusion;
pub mod engine;
pub mod error;
pub mod feature;
pub mod language;
pub mod neighborhood;
pub mod overlay;
pub mod registry;
pub mod rng;
pub mod roulette;
pub mod scenario;
pub mod similarity;
pub mod snapshot;
pub mod systems;
pub mod topology;
pub mod transmission;
pub mod world;

pub use agent::{Agent, AgentId, StepOutcome};
pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use language::Language;
pub use scenario::{Scenario, ScenarioLoader};
pub use world::World;
