use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spoken language of an agent. `XY` marks a bilingual speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    X,
    Y,
    XY,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::X, Language::Y, Language::XY];

    /// Trait value stored in feature 0 for this language.
    pub fn code(self) -> u32 {
        match self {
            Language::X => 1,
            Language::Y => 2,
            Language::XY => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Language::X),
            2 => Some(Language::Y),
            3 => Some(Language::XY),
            _ => None,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Language::X => "X",
            Language::Y => "Y",
            Language::XY => "XY",
        };
        f.write_str(label)
    }
}
