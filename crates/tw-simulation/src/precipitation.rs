use tw_grid::TerrainGrid;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::random::RandomSource;
use crate::system::System;

/// Injects water stochastically: each step, every site independently
/// receives one precipitation unit with probability `1 / width`.
#[derive(Debug)]
pub struct PrecipitationSystem {
    unit: f64,
}

impl PrecipitationSystem {
    /// Create a precipitation system adding `unit` water per event.
    pub fn new(unit: f64) -> Self {
        Self { unit }
    }

    /// Sample every site once and add water where the draw lands under the
    /// rain probability. Returns the touched coordinates, for diagnostics
    /// only; the side effect is confined to the water map.
    pub fn apply<R: RandomSource>(
        &self,
        grid: &mut TerrainGrid,
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        let p_rain = 1.0 / grid.width() as f64;
        let mut touched = Vec::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if rng.sample_unit() < p_rain {
                    grid.add_water(x, y, self.unit);
                    touched.push((x, y));
                }
            }
        }
        touched
    }
}

impl System for PrecipitationSystem {
    fn name(&self) -> &str {
        "precipitation"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let touched = self.apply(ctx.grid, ctx.rng);
        ctx.emit(
            SimEventKind::Precipitation {
                sites: touched.len(),
            },
            format!("precipitation wet {} sites", touched.len()),
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Scripted source returning a constant sample; never shuffles.
    struct ConstSample(f64);

    impl RandomSource for ConstSample {
        fn sample_unit(&mut self) -> f64 {
            self.0
        }
        fn shuffle<T>(&mut self, _items: &mut [T]) {}
    }

    #[test]
    fn low_draws_rain_everywhere() {
        let mut grid = TerrainGrid::new(4, 3, 0.0, 1.0);
        let system = PrecipitationSystem::new(0.5);
        let touched = system.apply(&mut grid, &mut ConstSample(0.0));
        assert_eq!(touched.len(), 12);
        assert_eq!(grid.total_water(), 6.0);
        assert_eq!(grid.water_at(3, 2), 0.5);
    }

    #[test]
    fn high_draws_never_rain() {
        let mut grid = TerrainGrid::new(4, 3, 0.0, 1.0);
        let system = PrecipitationSystem::new(0.5);
        let touched = system.apply(&mut grid, &mut ConstSample(0.9));
        assert!(touched.is_empty());
        assert_eq!(grid.total_water(), 0.0);
    }

    #[test]
    fn only_the_water_map_changes() {
        let mut grid = TerrainGrid::new(4, 3, 2.0, 1.0);
        let land_before = grid.land().clone();
        let flux_before = grid.flux().clone();
        let system = PrecipitationSystem::new(1.0);
        system.apply(&mut grid, &mut ConstSample(0.0));
        assert_eq!(*grid.land(), land_before);
        assert_eq!(*grid.flux(), flux_before);
    }

    #[test]
    fn water_added_matches_touched_sites() {
        let mut grid = TerrainGrid::new(8, 8, 0.0, 1.0);
        let system = PrecipitationSystem::new(0.25);
        let mut rng = StdRng::seed_from_u64(11);
        let touched = system.apply(&mut grid, &mut rng);
        let expected = touched.len() as f64 * 0.25;
        assert!((grid.total_water() - expected).abs() < 1e-12);
        for (x, y) in touched {
            assert_eq!(grid.water_at(x, y), 0.25);
        }
    }

    #[test]
    fn seeded_runs_touch_identical_sites() {
        let run = || {
            let mut grid = TerrainGrid::new(8, 8, 0.0, 1.0);
            let mut rng = StdRng::seed_from_u64(5);
            PrecipitationSystem::new(1.0).apply(&mut grid, &mut rng)
        };
        assert_eq!(run(), run());
    }
}
