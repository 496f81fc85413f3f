//! Interaction gate between an agent and the neighbor it picked.

use rand::Rng;

use crate::{
    error::SimError,
    feature::{FeatureSet, LANGUAGE_FEATURE},
    language::Language,
};

/// Fraction of the agent's active traits shared with the neighbor.
///
/// A bilingual on either side counts as one extra match on the language slot,
/// so the index can exceed 1. Returns `None` when the agent has no active
/// traits at all.
pub fn affinity_index(agent: &FeatureSet, neighbor: &FeatureSet) -> Option<f64> {
    let mut similar = 0_u32;
    let mut active = 0_u32;
    for (index, (own, other)) in agent.iter().zip(neighbor.iter()).enumerate() {
        if own.active {
            active += 1;
            if other.active && other.value == own.value {
                similar += 1;
            }
        }
        if index == LANGUAGE_FEATURE
            && (own.value == Language::XY.code() || other.value == Language::XY.code())
        {
            similar += 1;
        }
    }
    if active == 0 {
        return None;
    }
    Some(similar as f64 / active as f64)
}

/// Draws once and accepts the interaction with probability equal to the
/// affinity index.
pub fn decide<R: Rng + ?Sized>(
    agent: &FeatureSet,
    neighbor: &FeatureSet,
    rng: &mut R,
) -> Result<bool, SimError> {
    agent.ensure_same_shape(neighbor)?;
    let roll: f64 = rng.gen();
    Ok(affinity_index(agent, neighbor).is_some_and(|index| roll < index))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::feature::Feature;

    fn set(features: &[(u32, bool)]) -> FeatureSet {
        FeatureSet::from_features(
            features
                .iter()
                .enumerate()
                .map(|(id, &(value, active))| Feature::new(id, value, active))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn counts_only_active_matches() {
        let agent = set(&[(1, true), (4, true), (2, true), (3, false)]);
        let neighbor = set(&[(1, true), (4, true), (2, false), (3, true)]);
        // active on agent: 0,1,2 ; matching and active on both: 0,1
        assert_eq!(affinity_index(&agent, &neighbor), Some(2.0 / 3.0));
    }

    #[test]
    fn bilingual_adds_language_match() {
        let agent = set(&[(3, true), (5, true)]);
        let neighbor = set(&[(1, true), (6, true)]);
        assert_eq!(affinity_index(&agent, &neighbor), Some(0.5));

        let both = set(&[(3, true), (5, true)]);
        // identical bilinguals: 2 matches + bilingual bonus over 2 active
        assert_eq!(affinity_index(&agent, &both), Some(1.5));
    }

    #[test]
    fn no_active_traits_never_interacts() {
        let agent = FeatureSet::from_features(vec![
            Feature::new(0, 1, false),
            Feature::new(1, 2, false),
        ])
        .unwrap();
        let neighbor = set(&[(1, true), (2, true)]);
        assert_eq!(affinity_index(&agent, &neighbor), None);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            assert!(!decide(&agent, &neighbor, &mut rng).unwrap());
        }
    }

    #[test]
    fn identical_monolinguals_always_interact() {
        let agent = set(&[(1, true), (2, true), (3, true)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            assert!(decide(&agent, &agent.clone(), &mut rng).unwrap());
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let agent = set(&[(1, true), (2, true)]);
        let neighbor = set(&[(1, true)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            decide(&agent, &neighbor, &mut rng),
            Err(SimError::FeatureLengthMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
