use rand::Rng;
use rand::seq::index;

use super::Individual;

/// Best first; unevaluated individuals sink to the end. Ties keep their
/// relative order.
pub fn sort_descending(population: &mut [Individual]) {
    population.sort_by(|a, b| b.fitness_or_min().total_cmp(&a.fitness_or_min()));
}

/// Best of `size` distinct members drawn from the top half of a population
/// already sorted by [`sort_descending`].
pub fn tournament<'a, R: Rng + ?Sized>(
    ranked: &'a [Individual],
    size: usize,
    rng: &mut R,
) -> Option<&'a Individual> {
    let pool = (ranked.len() / 2).max(1).min(ranked.len());
    if pool == 0 {
        return None;
    }
    let entrants = size.clamp(1, pool);
    let winner = index::sample(rng, pool, entrants)
        .into_iter()
        .min()
        .unwrap_or(0);
    ranked.get(winner)
}
