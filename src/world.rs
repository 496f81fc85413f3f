use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    agent::{Agent, AgentId, StepContext, StepOutcome},
    error::SimError,
    feature::FeatureSet,
    neighborhood::{Neighbor, Neighborhood},
    overlay::SimilarityLayer,
    registry::SpeakerCensus,
    topology::{GridPos, TopologyProvider, TorusGrid},
    transmission::TransmissionModel,
};

/// Counters for the tick in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub steps: u64,
    pub interactions: u64,
    pub language_changes: u64,
    pub traits_copied: u64,
}

/// The similarity layer as written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major, one value per cell.
    pub similarity: Vec<f64>,
}

pub struct World {
    tick: u64,
    grid: TorusGrid,
    agents: Vec<Agent>,
    census: SpeakerCensus,
    layer: SimilarityLayer,
    model: TransmissionModel,
    stats: TickStats,
}

impl World {
    pub fn new(width: u32, height: u32, model: TransmissionModel) -> Self {
        Self {
            tick: 0,
            grid: TorusGrid::new(width, height),
            agents: Vec::new(),
            census: SpeakerCensus::default(),
            layer: SimilarityLayer::new(width, height),
            model,
            stats: TickStats::default(),
        }
    }

    /// Adds an agent on a free cell. Ids follow creation order.
    pub fn spawn(&mut self, features: FeatureSet, pos: GridPos) -> Result<AgentId, SimError> {
        let id = AgentId::new(self.agents.len() as u32);
        let agent = Agent::new(id, features)?;
        if let Some(first) = self.agents.first() {
            first.features().ensure_same_shape(agent.features())?;
        }
        self.grid.place(id, pos)?;
        self.census.add(agent.language());
        self.agents.push(agent);
        Ok(id)
    }

    /// Runs one agent's step against the live state of its neighbors.
    pub fn step_agent<R: Rng + ?Sized>(
        &mut self,
        id: AgentId,
        rng: &mut R,
    ) -> Result<StepOutcome, SimError> {
        let index = id.raw() as usize;
        if index >= self.agents.len() {
            return Err(SimError::UnknownAgent(id));
        }
        let position = self
            .grid
            .location_of(id)
            .ok_or(SimError::MissingLocation(id))?;
        let neighborhood = self.neighborhood(position)?;
        let ctx = StepContext {
            position,
            neighborhood: &neighborhood,
            registry: &self.census,
            model: &self.model,
            overlay: &mut self.layer,
        };
        let outcome = self.agents[index].step(ctx, rng)?;

        self.stats.steps += 1;
        if let Some(interaction) = outcome.interaction() {
            self.stats.interactions += 1;
            if interaction.from != interaction.to {
                self.stats.language_changes += 1;
                self.census.record_switch(interaction.from, interaction.to);
            }
            if interaction.copied_trait.is_some() {
                self.stats.traits_copied += 1;
            }
        }
        Ok(outcome)
    }

    /// Current state of the agents around `pos`.
    pub fn neighborhood(&self, pos: GridPos) -> Result<Neighborhood, SimError> {
        let neighbors = self
            .grid
            .neighbors_of(pos)
            .into_iter()
            .map(|id| {
                let agent = self.agent(id).ok_or(SimError::UnknownAgent(id))?;
                Ok(Neighbor {
                    id,
                    language: agent.language(),
                    features: agent.features().clone(),
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;
        Ok(Neighborhood::new(neighbors))
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.raw() as usize)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Ids in creation order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(Agent::id).collect()
    }

    pub fn census(&self) -> &SpeakerCensus {
        &self.census
    }

    pub fn grid(&self) -> &TorusGrid {
        &self.grid
    }

    pub fn layer(&self) -> &SimilarityLayer {
        &self.layer
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = TickStats::default();
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
    }

    pub fn snapshot(&self, scenario: &str) -> LayerSnapshot {
        LayerSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            width: self.layer.width(),
            height: self.layer.height(),
            similarity: self.layer.values().to_vec(),
        }
    }
}
