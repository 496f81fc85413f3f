use anyhow::Result;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Order in which agents take their step within a tick.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOrder {
    /// Creation order, identical every tick.
    #[default]
    Insertion,
    /// A fresh permutation each tick.
    Shuffled,
}

/// Steps every agent exactly once per tick. Later agents see the changes made
/// by earlier ones in the same tick.
pub struct InteractionSystem {
    order: ScheduleOrder,
}

impl InteractionSystem {
    pub fn new(order: ScheduleOrder) -> Self {
        Self { order }
    }
}

impl System for InteractionSystem {
    fn name(&self) -> &str {
        "interaction"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.reset_stats();
        let mut ids = world.agent_ids();
        if self.order == ScheduleOrder::Shuffled {
            ids.shuffle(rng);
        }
        for id in ids {
            world.step_agent(id, rng)?;
        }
        Ok(())
    }
}
