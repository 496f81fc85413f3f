//! Language transmission probabilities under the vertical and horizontal
//! regimes.
//!
//! A vertical event models a generational turnover: monolinguals pass their
//! language on unchanged while bilingual households may drift to one side.
//! A horizontal event models peer contact: monolinguals may pick up the other
//! language and become bilingual, bilinguals stay bilingual. Which regime
//! applies is a Bernoulli trial driven by the per-mille mortality rate.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    language::Language, neighborhood::Neighborhood, registry::PopulationRegistry,
    roulette::Weighted,
};

/// Where language densities are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodType {
    /// Occupied cells of the Moore window.
    #[default]
    Local,
    /// The whole population, as in a fully connected network.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Vertical,
    Horizontal,
}

impl Regime {
    /// Vertical with probability close to `mortality_rate / 1000`.
    ///
    /// The draw is an integer over `0..=floor(1000 / rate) - 1`; only zero
    /// selects the vertical regime.
    pub fn draw<R: Rng + ?Sized>(mortality_rate: f64, rng: &mut R) -> Self {
        let peak = ((1000.0 / mortality_rate).floor() as u64).saturating_sub(1);
        if rng.gen_range(0..=peak) == 0 {
            Regime::Vertical
        } else {
            Regime::Horizontal
        }
    }
}

/// Share of X and Y speakers around the agent. Bilinguals only add to the
/// denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Densities {
    pub x: f64,
    pub y: f64,
}

impl Densities {
    pub fn local(languages: impl IntoIterator<Item = Language>) -> Self {
        let (mut x, mut y, mut total) = (0_u32, 0_u32, 0_u32);
        for language in languages {
            match language {
                Language::X => x += 1,
                Language::Y => y += 1,
                Language::XY => {}
            }
            total += 1;
        }
        if total == 0 {
            return Self::default();
        }
        Self {
            x: x as f64 / total as f64,
            y: y as f64 / total as f64,
        }
    }

    pub fn global<P: PopulationRegistry + ?Sized>(registry: &P) -> Self {
        let total = registry.total_agents();
        if total == 0 {
            return Self::default();
        }
        Self {
            x: registry.count_by_language(Language::X) as f64 / total as f64,
            y: registry.count_by_language(Language::Y) as f64 / total as f64,
        }
    }
}

/// One possible outcome of a transmission event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionCandidate {
    pub target: Language,
    pub probability: f64,
}

impl TransmissionCandidate {
    pub fn new(target: Language, probability: f64) -> Self {
        Self {
            target,
            probability,
        }
    }
}

impl Weighted for TransmissionCandidate {
    fn weight(&self) -> f64 {
        self.probability
    }
}

/// Status, contact and volatility parameters of the competition model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmissionParams {
    /// Prestige of language X; Y carries the complement.
    pub status_x: f64,
    /// Exponent applied to densities.
    pub volatility: f64,
    pub c_xy_to_x: f64,
    pub c_xy_to_y: f64,
    pub c_x_to_xy: f64,
    pub c_y_to_xy: f64,
    /// Deaths per thousand agents per interaction.
    pub mortality_rate: f64,
    #[serde(default)]
    pub neighborhood: NeighborhoodType,
}

impl TransmissionParams {
    pub fn status_y(&self) -> f64 {
        1.0 - self.status_x
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TransmissionModel {
    params: TransmissionParams,
}

impl TransmissionModel {
    pub fn new(params: TransmissionParams) -> Self {
        Self { params }
    }

    pub fn densities<P: PopulationRegistry + ?Sized>(
        &self,
        neighborhood: &Neighborhood,
        registry: &P,
    ) -> Densities {
        match self.params.neighborhood {
            NeighborhoodType::Local => Densities::local(neighborhood.languages()),
            NeighborhoodType::Global => Densities::global(registry),
        }
    }

    /// Draws the regime, measures densities and lists the candidate outcomes
    /// for a speaker of `language`.
    pub fn compute_candidates<P, R>(
        &self,
        language: Language,
        neighborhood: &Neighborhood,
        registry: &P,
        rng: &mut R,
    ) -> (Regime, Vec<TransmissionCandidate>)
    where
        P: PopulationRegistry + ?Sized,
        R: Rng + ?Sized,
    {
        let regime = Regime::draw(self.params.mortality_rate, rng);
        let densities = self.densities(neighborhood, registry);
        (regime, self.candidates_for(language, regime, densities))
    }

    /// Candidate outcomes once regime and densities are known.
    pub fn candidates_for(
        &self,
        language: Language,
        regime: Regime,
        densities: Densities,
    ) -> Vec<TransmissionCandidate> {
        let p = &self.params;
        let x_pow = density_power(densities.x, p.volatility);
        let y_pow = density_power(densities.y, p.volatility);

        match (language, regime) {
            (Language::X, Regime::Vertical) => vec![TransmissionCandidate::new(Language::X, 1.0)],
            (Language::X, Regime::Horizontal) => {
                let to_xy = p.c_x_to_xy * p.status_y() * y_pow;
                vec![
                    TransmissionCandidate::new(Language::XY, to_xy),
                    TransmissionCandidate::new(Language::X, 1.0 - to_xy),
                ]
            }
            (Language::Y, Regime::Vertical) => vec![TransmissionCandidate::new(Language::Y, 1.0)],
            (Language::Y, Regime::Horizontal) => {
                let to_xy = p.c_y_to_xy * p.status_x * x_pow;
                vec![
                    TransmissionCandidate::new(Language::XY, to_xy),
                    TransmissionCandidate::new(Language::Y, 1.0 - to_xy),
                ]
            }
            (Language::XY, Regime::Vertical) => {
                let to_x = p.c_xy_to_x * p.status_x * x_pow;
                let to_y = p.c_xy_to_y * p.status_y() * y_pow;
                vec![
                    TransmissionCandidate::new(Language::X, to_x),
                    TransmissionCandidate::new(Language::Y, to_y),
                    TransmissionCandidate::new(Language::XY, 1.0 - to_x - to_y),
                ]
            }
            (Language::XY, Regime::Horizontal) => {
                vec![TransmissionCandidate::new(Language::XY, 1.0)]
            }
        }
    }
}

/// `density^volatility` with `0^0` taken as 1.
fn density_power(density: f64, volatility: f64) -> f64 {
    if volatility == 0.0 {
        1.0
    } else {
        density.powf(volatility)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::registry::SpeakerCensus;

    fn params() -> TransmissionParams {
        TransmissionParams {
            status_x: 0.5,
            volatility: 1.0,
            c_xy_to_x: 1.0,
            c_xy_to_y: 1.0,
            c_x_to_xy: 1.0,
            c_y_to_xy: 1.0,
            mortality_rate: 8.37,
            neighborhood: NeighborhoodType::Local,
        }
    }

    fn total(candidates: &[TransmissionCandidate]) -> f64 {
        candidates.iter().map(|c| c.probability).sum()
    }

    #[test]
    fn monolingual_vertical_keeps_language() {
        let model = TransmissionModel::new(params());
        let densities = Densities { x: 0.2, y: 0.8 };
        assert_eq!(
            model.candidates_for(Language::X, Regime::Vertical, densities),
            vec![TransmissionCandidate::new(Language::X, 1.0)]
        );
        assert_eq!(
            model.candidates_for(Language::Y, Regime::Vertical, densities),
            vec![TransmissionCandidate::new(Language::Y, 1.0)]
        );
    }

    #[test]
    fn bilingual_horizontal_stays_bilingual() {
        let model = TransmissionModel::new(params());
        let candidates =
            model.candidates_for(Language::XY, Regime::Horizontal, Densities { x: 0.5, y: 0.5 });
        assert_eq!(candidates, vec![TransmissionCandidate::new(Language::XY, 1.0)]);
    }

    #[test]
    fn horizontal_x_speaker_follows_y_density() {
        let model = TransmissionModel::new(params());
        let candidates =
            model.candidates_for(Language::X, Regime::Horizontal, Densities { x: 0.0, y: 1.0 });
        assert_eq!(candidates[0], TransmissionCandidate::new(Language::XY, 0.5));
        assert_eq!(candidates[1], TransmissionCandidate::new(Language::X, 0.5));
    }

    #[test]
    fn horizontal_y_speaker_follows_x_density() {
        let model = TransmissionModel::new(TransmissionParams {
            status_x: 0.8,
            volatility: 2.0,
            ..params()
        });
        let candidates =
            model.candidates_for(Language::Y, Regime::Horizontal, Densities { x: 0.5, y: 0.5 });
        assert_eq!(candidates[0].target, Language::XY);
        assert!((candidates[0].probability - 0.8 * 0.25).abs() < 1e-12);
        assert!((total(&candidates) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bilingual_vertical_splits_three_ways() {
        let model = TransmissionModel::new(TransmissionParams {
            status_x: 0.6,
            c_xy_to_x: 0.5,
            c_xy_to_y: 0.5,
            ..params()
        });
        let candidates =
            model.candidates_for(Language::XY, Regime::Vertical, Densities { x: 1.0, y: 1.0 });
        let targets: Vec<_> = candidates.iter().map(|c| c.target).collect();
        assert_eq!(targets, vec![Language::X, Language::Y, Language::XY]);
        assert!((candidates[0].probability - 0.3).abs() < 1e-12);
        assert!((candidates[1].probability - 0.2).abs() < 1e-12);
        assert!((candidates[2].probability - 0.5).abs() < 1e-12);
        assert!((total(&candidates) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_volatility_ignores_empty_density() {
        let model = TransmissionModel::new(TransmissionParams {
            volatility: 0.0,
            ..params()
        });
        let candidates =
            model.candidates_for(Language::X, Regime::Horizontal, Densities { x: 1.0, y: 0.0 });
        assert_eq!(candidates[0].probability, 0.5);
        assert!(candidates.iter().all(|c| c.probability.is_finite()));
    }

    #[test]
    fn candidates_always_sum_to_one() {
        let model = TransmissionModel::new(TransmissionParams {
            status_x: 0.37,
            volatility: 1.4,
            c_xy_to_x: 0.9,
            c_xy_to_y: 0.6,
            c_x_to_xy: 0.7,
            c_y_to_xy: 0.3,
            ..params()
        });
        let steps = [0.0, 0.125, 0.25, 0.5, 0.75, 1.0];
        for language in Language::ALL {
            for regime in [Regime::Vertical, Regime::Horizontal] {
                for &x in &steps {
                    for &y in steps.iter().filter(|&&y| x + y <= 1.0) {
                        let candidates =
                            model.candidates_for(language, regime, Densities { x, y });
                        assert!((total(&candidates) - 1.0).abs() < 1e-9);
                        assert!(candidates
                            .iter()
                            .all(|c| (0.0..=1.0).contains(&c.probability)));
                    }
                }
            }
        }
    }

    #[test]
    fn local_density_counts_bilinguals_in_denominator() {
        let densities = Densities::local([Language::X, Language::Y, Language::XY, Language::X]);
        assert_eq!(densities, Densities { x: 0.5, y: 0.25 });
        assert_eq!(Densities::local(std::iter::empty()), Densities::default());
    }

    #[test]
    fn global_density_reads_registry() {
        let census = SpeakerCensus { x: 30, y: 60, xy: 10 };
        assert_eq!(Densities::global(&census), Densities { x: 0.3, y: 0.6 });
        assert_eq!(
            Densities::global(&SpeakerCensus::default()),
            Densities::default()
        );
    }

    #[test]
    fn full_mortality_always_draws_vertical() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            assert_eq!(Regime::draw(1000.0, &mut rng), Regime::Vertical);
        }
    }

    #[test]
    fn low_mortality_is_mostly_horizontal() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let vertical = (0..10_000)
            .filter(|_| Regime::draw(10.0, &mut rng) == Regime::Vertical)
            .count();
        // expected around 100
        assert!((40..200).contains(&vertical), "{vertical} vertical draws");
    }
}
