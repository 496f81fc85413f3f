use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    affinity,
    diffusion,
    error::SimError,
    feature::FeatureSet,
    language::Language,
    neighborhood::{Neighborhood, MOORE_SIZE},
    overlay::OverlaySink,
    registry::PopulationRegistry,
    roulette,
    similarity,
    topology::GridPos,
    transmission::{Regime, TransmissionCandidate, TransmissionModel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent-{}", self.0)
    }
}

/// Everything an agent reads or writes outside itself during one step.
pub struct StepContext<'a, P: ?Sized, O: ?Sized> {
    pub position: GridPos,
    pub neighborhood: &'a Neighborhood,
    pub registry: &'a P,
    pub model: &'a TransmissionModel,
    pub overlay: &'a mut O,
}

/// Result of a completed interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub partner: AgentId,
    pub regime: Regime,
    pub from: Language,
    /// Equal to `from` when the language did not change, including when the
    /// roulette wheel came up empty.
    pub to: Language,
    pub copied_trait: Option<usize>,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The drawn Moore slot held no agent.
    NoPartner,
    /// Affinity test failed; nothing changed.
    Rejected { partner: AgentId },
    Interacted(Interaction),
}

impl StepOutcome {
    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            StepOutcome::Interacted(interaction) => Some(interaction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    language: Language,
    previous_language: Language,
    features: FeatureSet,
    similarity_index: f64,
}

impl Agent {
    pub fn new(id: AgentId, features: FeatureSet) -> Result<Self, SimError> {
        let language = Language::from_code(features.language_value()).ok_or_else(|| {
            SimError::MalformedFeatures(format!(
                "{id} language slot holds unknown value {}",
                features.language_value()
            ))
        })?;
        Ok(Self {
            id,
            language,
            previous_language: language,
            features,
            similarity_index: 0.0,
        })
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Language held before the most recent transmission.
    pub fn previous_language(&self) -> Language {
        self.previous_language
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn similarity_index(&self) -> f64 {
        self.similarity_index
    }

    /// One interaction attempt with a randomly drawn Moore slot.
    ///
    /// Draw order is fixed: slot, affinity, regime, roulette (only with more
    /// than one candidate), imitated trait (only when one exists).
    pub fn step<P, O, R>(
        &mut self,
        ctx: StepContext<'_, P, O>,
        rng: &mut R,
    ) -> Result<StepOutcome, SimError>
    where
        P: PopulationRegistry + ?Sized,
        O: OverlaySink + ?Sized,
        R: Rng + ?Sized,
    {
        let slot = rng.gen_range(0..MOORE_SIZE);
        let Some(partner) = ctx.neighborhood.slot(slot) else {
            return Ok(StepOutcome::NoPartner);
        };
        if !affinity::decide(&self.features, &partner.features, rng)? {
            return Ok(StepOutcome::Rejected {
                partner: partner.id,
            });
        }

        let (regime, candidates) =
            ctx.model
                .compute_candidates(self.language, ctx.neighborhood, ctx.registry, rng);
        // A lone candidate carries all the mass and is applied without a draw.
        let roll: f64 = if candidates.len() > 1 { rng.gen() } else { 0.0 };
        let from = self.language;
        self.apply_transmission(&candidates, roll);

        let copied_trait = diffusion::diffuse_one_feature(&mut self.features, &partner.features, rng);
        self.similarity_index =
            similarity::recompute(&self.features, ctx.neighborhood, ctx.position, ctx.overlay);

        Ok(StepOutcome::Interacted(Interaction {
            partner: partner.id,
            regime,
            from,
            to: self.language,
            copied_trait,
            similarity: self.similarity_index,
        }))
    }

    /// Spins the wheel with `roll` and adopts the winner. An exhausted wheel
    /// leaves the language as it was.
    fn apply_transmission(&mut self, candidates: &[TransmissionCandidate], roll: f64) {
        self.previous_language = self.language;
        match roulette::select_with_roll(candidates, roll) {
            Some(candidate) => self.set_language(candidate.target),
            None => trace!(agent = %self.id, ?candidates, roll, "roulette wheel exhausted"),
        }
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
        self.features.set_language(language);
    }
}
