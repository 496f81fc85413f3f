use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::SimError, language::Language};

/// Index of the feature that mirrors the agent's language.
pub const LANGUAGE_FEATURE: usize = 0;

/// One cultural trait slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: usize,
    pub value: u32,
    /// Inactive traits are ignored by affinity and never imitated.
    pub active: bool,
}

impl Feature {
    pub fn new(id: usize, value: u32, active: bool) -> Self {
        Self { id, value, active }
    }
}

/// Fixed-length, id-ordered trait sequence. Slot 0 is the language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Random cultural traits behind a fixed language slot.
    ///
    /// Trait values are uniform over `1..=num_traits`. With `random_activity`
    /// each trait is active on a fair coin, otherwise every trait is active.
    pub fn random<R: Rng + ?Sized>(
        language: Language,
        num_features: usize,
        num_traits: u32,
        random_activity: bool,
        rng: &mut R,
    ) -> Self {
        let mut features = Vec::with_capacity(num_features.max(1));
        features.push(Feature::new(LANGUAGE_FEATURE, language.code(), true));
        for id in 1..num_features {
            let value = rng.gen_range(1..=num_traits.max(1));
            let active = if random_activity {
                rng.gen_range(0..=1) == 0
            } else {
                true
            };
            features.push(Feature::new(id, value, active));
        }
        Self { features }
    }

    /// Builds a set from explicit features, checking id order and the
    /// language slot.
    pub fn from_features(features: Vec<Feature>) -> Result<Self, SimError> {
        if features.is_empty() {
            return Err(SimError::MalformedFeatures(
                "at least the language feature is required".into(),
            ));
        }
        for (index, feature) in features.iter().enumerate() {
            if feature.id != index {
                return Err(SimError::MalformedFeatures(format!(
                    "feature at position {index} carries id {}",
                    feature.id
                )));
            }
        }
        if Language::from_code(features[LANGUAGE_FEATURE].value).is_none() {
            return Err(SimError::MalformedFeatures(format!(
                "language feature holds unknown value {}",
                features[LANGUAGE_FEATURE].value
            )));
        }
        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn as_slice(&self) -> &[Feature] {
        &self.features
    }

    pub fn language_value(&self) -> u32 {
        self.features[LANGUAGE_FEATURE].value
    }

    pub fn ensure_same_shape(&self, other: &FeatureSet) -> Result<(), SimError> {
        if self.len() != other.len() {
            return Err(SimError::FeatureLengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.features[LANGUAGE_FEATURE].value = language.code();
    }

    /// Overwrites value and activity of slot `index`; the id stays put.
    pub(crate) fn copy_trait(&mut self, index: usize, source: &Feature) {
        if let Some(target) = self.features.get_mut(index) {
            target.value = source.value;
            target.active = source.active;
        }
    }
}
