//! Roulette-wheel selection over a short list of weighted outcomes.

use rand::Rng;

/// Anything carrying probability mass on the wheel.
pub trait Weighted {
    fn weight(&self) -> f64;
}

/// Spins the wheel once.
///
/// Walks `candidates` in order and returns the first whose cumulative mass
/// reaches the draw. `None` when rounding leaves the total short of the draw.
pub fn select<'a, C, R>(candidates: &'a [C], rng: &mut R) -> Option<&'a C>
where
    C: Weighted,
    R: Rng + ?Sized,
{
    let roll: f64 = rng.gen();
    select_with_roll(candidates, roll)
}

/// Same walk as [`select`] with the draw supplied by the caller.
pub fn select_with_roll<C: Weighted>(candidates: &[C], roll: f64) -> Option<&C> {
    let mut cumulative = 0.0;
    for candidate in candidates {
        cumulative += candidate.weight();
        if roll <= cumulative {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Slot(&'static str, f64);

    impl Weighted for Slot {
        fn weight(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn picks_first_slot_covering_roll() {
        let wheel = [Slot("a", 0.2), Slot("b", 0.5), Slot("c", 0.3)];
        assert_eq!(select_with_roll(&wheel, 0.0).map(|s| s.0), Some("a"));
        assert_eq!(select_with_roll(&wheel, 0.2).map(|s| s.0), Some("a"));
        assert_eq!(select_with_roll(&wheel, 0.21).map(|s| s.0), Some("b"));
        assert_eq!(select_with_roll(&wheel, 0.95).map(|s| s.0), Some("c"));
    }

    #[test]
    fn short_wheel_selects_nothing() {
        let wheel = [Slot("a", 0.25), Slot("b", 0.25)];
        assert_eq!(select_with_roll(&wheel, 0.75), None);
        assert_eq!(select_with_roll::<Slot>(&[], 0.1), None);
    }

    #[test]
    fn fixed_seed_repeats_selection() {
        let wheel = [Slot("a", 0.3), Slot("b", 0.3), Slot("c", 0.4)];
        let picks = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..32)
                .map(|_| select(&wheel, &mut rng).map(|s| s.0))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(77), picks(77));
    }

    #[test]
    fn heavier_slot_wins_more_often() {
        let wheel = [Slot("light", 0.1), Slot("heavy", 0.9)];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let heavy = (0..2_000)
            .filter(|_| select(&wheel, &mut rng).map(|s| s.0) == Some("heavy"))
            .count();
        assert!(heavy > 1_600, "heavy slot picked {heavy} times");
    }
}
