use anyhow::Result;
use tracing::error;

use crate::{
    agent::Agent,
    engine::{System, SystemContext},
    error::SimError,
    registry::SpeakerCensus,
    rng::SystemRng,
    world::World,
};

/// Fails the run as soon as agent state drifts out of shape.
pub struct ConsistencySystem {
    num_features: usize,
}

impl ConsistencySystem {
    pub fn new(num_features: usize) -> Self {
        Self { num_features }
    }

    fn check_agent(&self, agent: &Agent) -> Option<String> {
        let features = agent.features();
        if features.len() != self.num_features {
            return Some(format!(
                "{} carries {} features, expected {}",
                agent.id(),
                features.len(),
                self.num_features
            ));
        }
        if features.language_value() != agent.language().code() {
            return Some(format!(
                "{} speaks {} but its language feature holds {}",
                agent.id(),
                agent.language(),
                features.language_value()
            ));
        }
        if !(0.0..=1.0).contains(&agent.similarity_index()) {
            return Some(format!(
                "{} similarity {} outside [0, 1]",
                agent.id(),
                agent.similarity_index()
            ));
        }
        None
    }
}

impl System for ConsistencySystem {
    fn name(&self) -> &str {
        "consistency"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mut problem = world
            .agents()
            .iter()
            .find_map(|agent| self.check_agent(agent));
        if problem.is_none() {
            let recount = SpeakerCensus::tally(world.agents().iter().map(Agent::language));
            if recount != *world.census() {
                problem = Some(format!(
                    "census {:?} disagrees with agents {:?}",
                    world.census(),
                    recount
                ));
            }
        }
        if let Some(detail) = problem {
            error!(tick = ctx.tick, %detail, "agent state inconsistent");
            return Err(SimError::InvariantViolated {
                tick: ctx.tick,
                detail,
            }
            .into());
        }
        Ok(())
    }
}
