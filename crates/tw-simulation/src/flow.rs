use tw_grid::TerrainGrid;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::random::RandomSource;
use crate::system::System;

/// Which branch produced the allocation ratios for one flow event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatioBasis {
    /// At least one strictly downhill neighbor: proportional to steepness.
    Downhill,
    /// Perfectly flat neighborhood: uniform fallback.
    FlatFallback,
}

/// Allocation ratios over the 8 neighbors from their floored surface drops.
///
/// A flat neighborhood (every drop zero) falls back to a uniform 1/8 split
/// rather than being treated as an error. A negative drop sum is impossible
/// because every drop is floored at zero before summing.
fn allocation_ratios(drops: &[f64; 8]) -> ([f64; 8], RatioBasis) {
    let total: f64 = drops.iter().sum();
    debug_assert!(total >= 0.0, "negative drop sum {total}");
    if total > 0.0 {
        (drops.map(|d| d / total), RatioBasis::Downhill)
    } else {
        ([1.0 / 8.0; 8], RatioBasis::FlatFallback)
    }
}

/// Redistributes water from a site to its 8 neighbors and erodes the land
/// under it.
///
/// This is the ordering-sensitive heart of the engine: within one call,
/// allocations to later neighbors observe the water already spent on
/// earlier ones, and within one step, later sites observe the effects of
/// earlier sites. The sweep order is permuted per step; the permutation is
/// reused across the passes of that step.
#[derive(Debug)]
pub struct FlowSystem {
    erosion_rate: f64,
    passes: u32,
}

impl FlowSystem {
    /// Create a flow system with the given erosion rate and number of
    /// full-grid passes per step.
    pub fn new(erosion_rate: f64, passes: u32) -> Self {
        Self {
            erosion_rate,
            passes,
        }
    }

    /// Redistribute water from `(x, y)` downhill and erode the source land.
    ///
    /// Returns the amount of water discarded into virtual boundary cells by
    /// this call. A dry site is a no-op. Afterwards the site's water is
    /// non-negative, its recorded flux has not decreased, and its land
    /// height has not risen.
    pub fn flow<R: RandomSource>(
        &self,
        grid: &mut TerrainGrid,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> f64 {
        if grid.water_at(x, y) <= 0.0 {
            return 0.0;
        }
        // The gradient for this event is measured once, before any of its
        // own redistribution.
        let surface = grid.surface_at(x, y);

        let mut neighbors = grid.neighbors8(x, y);
        rng.shuffle(&mut neighbors);

        let mut drops = [0.0_f64; 8];
        for (i, n) in neighbors.iter().enumerate() {
            drops[i] = (surface - grid.surface_of(n)).max(0.0);
        }
        let (ratios, _basis) = allocation_ratios(&drops);

        let mut boundary_loss = 0.0;
        for (n, ratio) in neighbors.iter().zip(ratios) {
            let water = grid.water_at(x, y);
            // Earlier neighbors may have spent the source's budget or
            // raised this neighbor's surface.
            if water <= 0.0 || grid.surface_of(n) >= surface {
                continue;
            }
            let height = grid.height_at(x, y);
            let n_height = grid.height_of(n);
            let n_water = grid.water_of(n);

            let mut flow = if height > n_height {
                let gap = height - n_height;
                if n_water + water < gap {
                    // The water column fits inside the land gap.
                    ratio * water
                } else {
                    ratio * (water - (water + n_water - gap) / 2.0)
                }
            } else {
                // Ponding over equal or higher land: move toward a shared
                // surface instead.
                (ratio * (surface - grid.surface_of(n)) / 2.0).min(water)
            };
            // A late neighbor can sit above the source's remaining column;
            // never pull water uphill.
            flow = flow.max(0.0);
            // Transport discount.
            flow -= flow * self.erosion_rate / 2.0;

            // The source pays regardless of where the water lands; virtual
            // deposits are the boundary mass-loss channel.
            grid.add_water(x, y, -flow);
            grid.add_flux(x, y, flow);
            if !grid.deposit(n, flow) {
                boundary_loss += flow;
            }
            grid.add_height(x, y, -(self.erosion_rate * flow));
        }

        // Floating-point drift guard.
        if grid.water_at(x, y) < 0.0 {
            grid.set_water(x, y, 0.0);
        }
        boundary_loss
    }
}

impl System for FlowSystem {
    fn name(&self) -> &str {
        "flow"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let mut xs: Vec<usize> = (0..ctx.grid.width()).collect();
        let mut ys: Vec<usize> = (0..ctx.grid.height()).collect();
        // One permutation pair per step, reused across passes: the scan
        // order stays stable within a step and varies between steps.
        ctx.rng.shuffle(&mut xs);
        ctx.rng.shuffle(&mut ys);

        let mut lost = 0.0;
        for _ in 0..self.passes {
            for &x in &xs {
                for &y in &ys {
                    lost += self.flow(ctx.grid, x, y, ctx.rng);
                }
            }
        }
        if lost > 0.0 {
            ctx.emit(
                SimEventKind::BoundaryLoss { amount: lost },
                format!("{lost:.4} water left the grid"),
            );
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
