use crate::{agent::AgentId, feature::FeatureSet, language::Language};

/// Size of a full Moore neighborhood.
pub const MOORE_SIZE: usize = 8;

/// What an agent can see of one occupied neighbor cell during its step.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: AgentId,
    pub language: Language,
    pub features: FeatureSet,
}

/// Occupants of the Moore window around one agent, in topology order.
/// Empty cells are skipped, so there are at most [`MOORE_SIZE`] entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    neighbors: Vec<Neighbor>,
}

impl Neighborhood {
    pub fn new(neighbors: Vec<Neighbor>) -> Self {
        debug_assert!(neighbors.len() <= MOORE_SIZE);
        Self { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbor occupying the `slot`-th present position, if any.
    pub fn slot(&self, slot: usize) -> Option<&Neighbor> {
        self.neighbors.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.iter()
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.neighbors.iter().map(|neighbor| neighbor.language)
    }
}
