//! Movement policies shared by every species.
//!
//! Each policy enumerates the Moore neighborhood at `floor(speed)`, optionally
//! keeps only one terrain, and either draws uniformly or defers to a
//! weighted-rank selection. An empty filtered set means "stay put".

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SimError;
use crate::simulation::selection::{farthest_weighted, nearest_weighted};
use crate::world::{Position, Terrain, World};

/// How an agent flees from threats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeRoute {
    /// Farthest-weighted among cells of this terrain; stay if there are none.
    Confined(Terrain),
    /// Any cell of this terrain, chosen uniformly; otherwise farthest-weighted
    /// over the whole neighborhood.
    Refuge(Terrain),
}

fn candidates(
    world: &World,
    pos: Position,
    speed: f64,
    include_center: bool,
    terrain: Option<Terrain>,
) -> Result<Vec<Position>, SimError> {
    let cells = world.index.neighborhood_positions(pos, speed, include_center)?;
    match terrain {
        Some(t) => world.cells_of(cells, t),
        None => Ok(cells),
    }
}

/// Uniform step within `speed`, the current cell included.
pub fn random_move<R: Rng + ?Sized>(
    world: &World,
    pos: Position,
    speed: f64,
    terrain: Option<Terrain>,
    rng: &mut R,
) -> Result<Position, SimError> {
    let cells = candidates(world, pos, speed, true, terrain)?;
    Ok(cells.choose(rng).copied().unwrap_or(pos))
}

/// Step towards `target`, favouring the cells closest to it.
pub fn chase_or_home<R: Rng + ?Sized>(
    world: &World,
    pos: Position,
    target: Position,
    speed: f64,
    terrain: Option<Terrain>,
    weights: &[f64],
    rng: &mut R,
) -> Result<Position, SimError> {
    let cells = candidates(world, pos, speed, false, terrain)?;
    if cells.is_empty() {
        return Ok(pos);
    }
    nearest_weighted(&cells, target, weights, rng)
}

/// Step away from `threats` following `route`.
pub fn escape<R: Rng + ?Sized>(
    world: &World,
    pos: Position,
    threats: &[Position],
    speed: f64,
    route: EscapeRoute,
    weights: &[f64],
    rng: &mut R,
) -> Result<Position, SimError> {
    let cells = candidates(world, pos, speed, false, None)?;
    match route {
        EscapeRoute::Confined(terrain) => {
            let allowed = world.cells_of(cells, terrain)?;
            if allowed.is_empty() {
                return Ok(pos);
            }
            farthest_weighted(&allowed, threats, weights, rng)
        }
        EscapeRoute::Refuge(terrain) => {
            let refuge = world.cells_of(cells.clone(), terrain)?;
            if let Some(&cell) = refuge.choose(rng) {
                return Ok(cell);
            }
            if cells.is_empty() {
                return Ok(pos);
            }
            farthest_weighted(&cells, threats, weights, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ecology::LandRegion;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const WEIGHTS: [f64; 5] = [0.3, 0.3, 0.2, 0.1, 0.1];

    fn world() -> World {
        World::new(
            40,
            &LandRegion {
                x: [10, 20],
                y: [10, 20],
            },
        )
    }

    #[test]
    fn filtered_random_move_lands_on_terrain_or_stays() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for x in 6..24 {
            for y in [8, 12, 21] {
                let start = Position::new(x, y);
                for _ in 0..20 {
                    let to = random_move(&world, start, 2.0, Some(Terrain::Water), &mut rng).unwrap();
                    assert!(
                        to == start || world.terrain.terrain_at(to).unwrap() == Terrain::Water,
                        "{:?} -> {:?} left the water",
                        start,
                        to
                    );
                    assert!(to.chebyshev(start) <= 2);
                }
            }
        }
    }

    #[test]
    fn random_move_without_matching_terrain_stays() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let centre = Position::new(15, 15);
        for _ in 0..20 {
            assert_eq!(
                random_move(&world, centre, 2.0, Some(Terrain::Water), &mut rng).unwrap(),
                centre
            );
        }
    }

    #[test]
    fn unfiltered_random_move_can_stay() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let start = Position::new(30, 30);
        let stayed = (0..500)
            .map(|_| random_move(&world, start, 1.0, None, &mut rng).unwrap())
            .any(|p| p == start);
        assert!(stayed);
    }

    #[test]
    fn chase_moves_closer_and_respects_filter() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let start = Position::new(30, 15);
        let target = Position::new(5, 15);
        for _ in 0..200 {
            let to =
                chase_or_home(&world, start, target, 3.0, Some(Terrain::Water), &WEIGHTS, &mut rng)
                    .unwrap();
            assert_ne!(to, start);
            assert!(to.distance(target) < start.distance(target));
            assert_eq!(world.terrain.terrain_at(to).unwrap(), Terrain::Water);
        }
    }

    #[test]
    fn chase_with_no_candidates_stays() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let start = Position::new(15, 15);
        let to = chase_or_home(
            &world,
            start,
            Position::new(0, 0),
            1.0,
            Some(Terrain::Water),
            &WEIGHTS,
            &mut rng,
        )
        .unwrap();
        assert_eq!(to, start);
        let to = chase_or_home(&world, start, Position::new(0, 0), 0.0, None, &WEIGHTS, &mut rng)
            .unwrap();
        assert_eq!(to, start);
    }

    #[test]
    fn confined_escape_moves_away_within_terrain() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let start = Position::new(30, 30);
        let threat = Position::new(28, 30);
        for _ in 0..200 {
            let to = escape(
                &world,
                start,
                &[threat],
                2.0,
                EscapeRoute::Confined(Terrain::Water),
                &WEIGHTS,
                &mut rng,
            )
            .unwrap();
            assert!(to.distance(threat) > start.distance(threat));
        }
    }

    #[test]
    fn confined_escape_without_terrain_stays() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let start = Position::new(15, 15);
        let to = escape(
            &world,
            start,
            &[Position::new(14, 15)],
            2.0,
            EscapeRoute::Confined(Terrain::Water),
            &WEIGHTS,
            &mut rng,
        )
        .unwrap();
        assert_eq!(to, start);
    }

    #[test]
    fn refuge_escape_prefers_refuge_terrain() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let start = Position::new(9, 15);
        for _ in 0..100 {
            let to = escape(
                &world,
                start,
                &[Position::new(5, 15)],
                3.0,
                EscapeRoute::Refuge(Terrain::Land),
                &WEIGHTS,
                &mut rng,
            )
            .unwrap();
            assert_eq!(world.terrain.terrain_at(to).unwrap(), Terrain::Land);
        }
    }

    #[test]
    fn refuge_escape_falls_back_to_farthest() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = Position::new(32, 32);
        let threat = Position::new(30, 32);
        for _ in 0..100 {
            let to = escape(
                &world,
                start,
                &[threat],
                3.0,
                EscapeRoute::Refuge(Terrain::Land),
                &WEIGHTS,
                &mut rng,
            )
            .unwrap();
            assert_eq!(to.x, 35);
        }
    }
}
