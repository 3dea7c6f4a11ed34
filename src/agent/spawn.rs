use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::world::{Position, Terrain, TerrainGrid};

/// Draw a home cell of the requested terrain by rejection sampling.
///
/// Each coordinate is drawn from `Normal(mean, sigma)`, truncated towards zero
/// and clamped to the grid. A miss triggers a resample; after the first draw
/// plus `max_retries` resamples the search gives up. `None` as the cap keeps
/// sampling until it succeeds, unless the grid holds no cell of that terrain.
pub fn sample_home<R: Rng + ?Sized>(
    mean: [f64; 2],
    sigma: f64,
    terrain: &TerrainGrid,
    kind: Terrain,
    max_retries: Option<u32>,
    rng: &mut R,
) -> Option<Position> {
    if terrain.count(kind) == 0 {
        return None;
    }
    let dist_x = Normal::new(mean[0], sigma).ok()?;
    let dist_y = Normal::new(mean[1], sigma).ok()?;
    let upper = terrain.size() - 1;

    let mut draws: u32 = 0;
    loop {
        draws = draws.saturating_add(1);
        let x = (dist_x.sample(rng).trunc() as i32).clamp(0, upper);
        let y = (dist_y.sample(rng).trunc() as i32).clamp(0, upper);
        let pos = Position::new(x, y);
        if terrain.terrain_at(pos).ok() == Some(kind) {
            return Some(pos);
        }
        if let Some(cap) = max_retries {
            if draws > cap {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ecology::LandRegion;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid() -> TerrainGrid {
        TerrainGrid::new(
            200,
            &LandRegion {
                x: [50, 80],
                y: [50, 100],
            },
        )
    }

    #[test]
    fn homes_match_requested_terrain() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let home = sample_home([150.0, 50.0], 20.0, &grid, Terrain::Water, Some(50), &mut rng)
                .expect("water is plentiful around (150, 50)");
            assert_eq!(grid.terrain_at(home).unwrap(), Terrain::Water);

            let home = sample_home([70.0, 70.0], 20.0, &grid, Terrain::Land, Some(50), &mut rng)
                .expect("penguin mean sits on land");
            assert_eq!(grid.terrain_at(home).unwrap(), Terrain::Land);
        }
    }

    #[test]
    fn draws_are_clamped_to_grid() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let home =
                sample_home([-500.0, 900.0], 3.0, &grid, Terrain::Water, Some(0), &mut rng).unwrap();
            assert_eq!(home, Position::new(0, 199));
        }
    }

    #[test]
    fn capped_search_gives_up() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Far corner with a tiny spread never reaches the land rectangle.
        let home = sample_home([190.0, 190.0], 3.0, &grid, Terrain::Land, Some(50), &mut rng);
        assert_eq!(home, None);
    }

    #[test]
    fn uncapped_search_without_terrain_returns_none() {
        let grid = TerrainGrid::new(10, &LandRegion { x: [0, 0], y: [0, 0] });
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(
            sample_home([5.0, 5.0], 3.0, &grid, Terrain::Land, None, &mut rng),
            None
        );
    }

    #[test]
    fn uncapped_search_keeps_trying() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // Mean well off the land; the wide spread hits it only every few dozen draws.
        let home = sample_home([20.0, 20.0], 30.0, &grid, Terrain::Land, None, &mut rng).unwrap();
        assert_eq!(grid.terrain_at(home).unwrap(), Terrain::Land);
    }

    #[test]
    fn invalid_sigma_yields_none() {
        let grid = grid();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        assert_eq!(
            sample_home([10.0, 10.0], f64::NAN, &grid, Terrain::Water, None, &mut rng),
            None
        );
    }
}
