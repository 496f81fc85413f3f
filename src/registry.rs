use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Global head count by language, used by the fully connected density mode.
pub trait PopulationRegistry {
    fn count_by_language(&self, language: Language) -> u64;
    fn total_agents(&self) -> u64;
}

/// Live speaker counts, adjusted as agents switch language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerCensus {
    pub x: u64,
    pub y: u64,
    pub xy: u64,
}

impl SpeakerCensus {
    pub fn tally(languages: impl IntoIterator<Item = Language>) -> Self {
        let mut census = Self::default();
        for language in languages {
            census.add(language);
        }
        census
    }

    pub fn add(&mut self, language: Language) {
        *self.slot_mut(language) += 1;
    }

    pub fn record_switch(&mut self, from: Language, to: Language) {
        if from == to {
            return;
        }
        let slot = self.slot_mut(from);
        *slot = slot.saturating_sub(1);
        *self.slot_mut(to) += 1;
    }

    fn slot_mut(&mut self, language: Language) -> &mut u64 {
        match language {
            Language::X => &mut self.x,
            Language::Y => &mut self.y,
            Language::XY => &mut self.xy,
        }
    }
}

impl PopulationRegistry for SpeakerCensus {
    fn count_by_language(&self, language: Language) -> u64 {
        match language {
            Language::X => self.x,
            Language::Y => self.y,
            Language::XY => self.xy,
        }
    }

    fn total_agents(&self) -> u64 {
        self.x + self.y + self.xy
    }
}
