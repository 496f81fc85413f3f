use rand::Rng;

use crate::feature::{FeatureSet, LANGUAGE_FEATURE};

/// Cultural slots where the neighbor holds an active trait the agent lacks.
/// The language slot is never included.
pub fn imitable_traits(agent: &FeatureSet, neighbor: &FeatureSet) -> Vec<usize> {
    agent
        .iter()
        .zip(neighbor.iter())
        .enumerate()
        .skip(LANGUAGE_FEATURE + 1)
        .filter(|(_, (own, other))| other.active && other.value != own.value)
        .map(|(index, _)| index)
        .collect()
}

/// Copies one imitable trait, chosen uniformly, from `neighbor` into `agent`.
///
/// Returns the copied slot, or `None` (without drawing) when there is nothing
/// to imitate.
pub fn diffuse_one_feature<R: Rng + ?Sized>(
    agent: &mut FeatureSet,
    neighbor: &FeatureSet,
    rng: &mut R,
) -> Option<usize> {
    let candidates = imitable_traits(agent, neighbor);
    if candidates.is_empty() {
        return None;
    }
    let index = candidates[rng.gen_range(0..candidates.len())];
    let source = *neighbor.get(index)?;
    agent.copy_trait(index, &source);
    Some(index)
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
    fn skips_language_inactive_and_equal_slots() {
        let agent = set(&[(1, true), (2, true), (3, true), (4, false), (5, true)]);
        let neighbor = set(&[(2, true), (2, true), (9, false), (7, true), (6, true)]);
        assert_eq!(imitable_traits(&agent, &neighbor), vec![3, 4]);
    }

    #[test]
    fn nothing_to_imitate_leaves_agent_untouched() {
        let mut agent = set(&[(1, true), (2, true), (3, true)]);
        let neighbor = set(&[(2, true), (2, true), (8, false)]);
        let before = agent.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(diffuse_one_feature(&mut agent, &neighbor, &mut rng), None);
        assert_eq!(agent, before);
    }

    #[test]
    fn copies_value_and_activity_of_one_slot() {
        let mut agent = set(&[(1, true), (2, false), (3, true), (4, true)]);
        let neighbor = set(&[(1, true), (5, true), (3, true), (4, true)]);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        assert_eq!(diffuse_one_feature(&mut agent, &neighbor, &mut rng), Some(1));
        assert_eq!(agent.get(1), Some(&Feature::new(1, 5, true)));
        assert_eq!(agent.language_value(), 1);
    }

    #[test]
    fn only_one_slot_changes_per_call() {
        let mut agent = set(&[(1, true), (1, true), (1, true), (1, true)]);
        let neighbor = set(&[(2, true), (2, true), (2, true), (2, true)]);
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let copied = diffuse_one_feature(&mut agent, &neighbor, &mut rng).unwrap();
        let changed: Vec<usize> = agent
            .iter()
            .enumerate()
            .filter(|(_, feature)| feature.value == 2)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(changed, vec![copied]);
        assert_eq!(agent.language_value(), 1);
    }
}
