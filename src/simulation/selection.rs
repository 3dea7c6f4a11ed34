//! Weighted-rank target selection.
//!
//! Candidates are ranked by distance, the list is truncated to one entry per
//! weight, and a single cell is drawn with the weights as relative
//! probabilities (weight 0 belongs to the best-ranked candidate). When fewer
//! candidates than weights exist, the weight vector is cut to match and the
//! draw renormalizes over what remains.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::SimError;
use crate::world::Position;

/// Pick a cell close to `target`.
pub fn nearest_weighted<R: Rng + ?Sized>(
    candidates: &[Position],
    target: Position,
    weights: &[f64],
    rng: &mut R,
) -> Result<Position, SimError> {
    if candidates.is_empty() {
        return Err(SimError::EmptyCandidateSet {
            policy: "nearest_weighted",
        });
    }
    let mut ranked: Vec<(Position, f64)> = candidates
        .iter()
        .map(|&c| (c, c.distance(target)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(draw_ranked(&ranked, weights, rng))
}

/// Pick a cell far from every threat, ranking by summed distance.
pub fn farthest_weighted<R: Rng + ?Sized>(
    candidates: &[Position],
    threats: &[Position],
    weights: &[f64],
    rng: &mut R,
) -> Result<Position, SimError> {
    if candidates.is_empty() {
        return Err(SimError::EmptyCandidateSet {
            policy: "farthest_weighted",
        });
    }
    let mut ranked: Vec<(Position, f64)> = candidates
        .iter()
        .map(|&c| (c, threats.iter().map(|&t| c.distance(t)).sum()))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(draw_ranked(&ranked, weights, rng))
}

/// Weighted draw over the head of a ranked, non-empty list.
/// Weights that cannot form a distribution select the top-ranked entry.
fn draw_ranked<R: Rng + ?Sized>(ranked: &[(Position, f64)], weights: &[f64], rng: &mut R) -> Position {
    let k = weights.len().min(ranked.len());
    match WeightedIndex::new(&weights[..k]) {
        Ok(dist) => ranked[dist.sample(rng)].0,
        Err(_) => ranked[0].0,
    }
}
