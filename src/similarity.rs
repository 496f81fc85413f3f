use crate::{
    feature::FeatureSet,
    neighborhood::{Neighborhood, MOORE_SIZE},
    overlay::OverlaySink,
    topology::GridPos,
};

/// Share of (trait, neighbor) pairs that match, the language slot included.
///
/// The denominator always assumes a full Moore window, so empty cells around
/// the agent pull the value down.
pub fn similarity_index(agent: &FeatureSet, neighborhood: &Neighborhood) -> f64 {
    if agent.is_empty() {
        return 0.0;
    }
    let matches: usize = neighborhood
        .iter()
        .map(|neighbor| {
            agent
                .iter()
                .zip(neighbor.features.iter())
                .filter(|(own, other)| own.value == other.value)
                .count()
        })
        .sum();
    matches as f64 / (agent.len() * MOORE_SIZE) as f64
}

/// Recomputes the agent's similarity and writes it to its cell.
pub fn recompute<O: OverlaySink + ?Sized>(
    agent: &FeatureSet,
    neighborhood: &Neighborhood,
    pos: GridPos,
    sink: &mut O,
) -> f64 {
    let similarity = similarity_index(agent, neighborhood);
    sink.set_cell_value(pos, similarity);
    similarity
}
