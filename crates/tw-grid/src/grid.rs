use serde::{Deserialize, Serialize};

use crate::map::ScalarMap;
use crate::site::{NEIGHBOR_OFFSETS, Site};

/// The central terrain model. Owns the three co-located scalar maps.
///
/// All three maps are created together at construction with identical
/// dimensions and are mutated in place; they are never resized. Boundary
/// padding is not stored — out-of-range rows are resolved on demand as
/// [`Site::Virtual`] descriptors by [`TerrainGrid::neighbor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    land: ScalarMap,
    water: ScalarMap,
    flux: ScalarMap,
    edge_offset: f64,
}

impl TerrainGrid {
    /// Create a grid with uniform land height, no water, and no recorded flow.
    ///
    /// `edge_offset` is the magnitude by which virtual padding rows sit below
    /// (sink side) or above (barrier side) the adjacent edge row.
    pub fn new(width: usize, height: usize, initial_land: f64, edge_offset: f64) -> Self {
        Self {
            land: ScalarMap::filled(width, height, initial_land),
            water: ScalarMap::new(width, height),
            flux: ScalarMap::new(width, height),
            edge_offset,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.land.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.land.height()
    }

    /// Land height at `(x, y)`.
    #[inline]
    pub fn height_at(&self, x: usize, y: usize) -> f64 {
        self.land.get(x, y)
    }

    /// Water depth at `(x, y)`.
    #[inline]
    pub fn water_at(&self, x: usize, y: usize) -> f64 {
        self.water.get(x, y)
    }

    /// Cumulative outgoing flow recorded at `(x, y)`.
    #[inline]
    pub fn flux_at(&self, x: usize, y: usize) -> f64 {
        self.flux.get(x, y)
    }

    /// Surface height at `(x, y)`: land plus water.
    #[inline]
    pub fn surface_at(&self, x: usize, y: usize) -> f64 {
        self.land.get(x, y) + self.water.get(x, y)
    }

    /// Overwrite the land height at `(x, y)`.
    pub fn set_height(&mut self, x: usize, y: usize, value: f64) {
        self.land.set(x, y, value);
    }

    /// Add `delta` to the land height at `(x, y)`.
    pub fn add_height(&mut self, x: usize, y: usize, delta: f64) {
        self.land.add(x, y, delta);
    }

    /// Overwrite the water depth at `(x, y)`.
    pub fn set_water(&mut self, x: usize, y: usize, value: f64) {
        self.water.set(x, y, value);
    }

    /// Add `delta` to the water depth at `(x, y)`.
    pub fn add_water(&mut self, x: usize, y: usize, delta: f64) {
        self.water.add(x, y, delta);
    }

    /// Record `amount` of outgoing flow at `(x, y)`.
    pub fn add_flux(&mut self, x: usize, y: usize, amount: f64) {
        self.flux.add(x, y, amount);
    }

    /// The land map.
    pub fn land(&self) -> &ScalarMap {
        &self.land
    }

    /// The water map.
    pub fn water(&self) -> &ScalarMap {
        &self.water
    }

    /// The flow-accumulation map.
    pub fn flux(&self) -> &ScalarMap {
        &self.flux
    }

    /// Total water currently on the grid.
    pub fn total_water(&self) -> f64 {
        self.water.sum()
    }

    /// Total land height over the grid.
    pub fn total_land(&self) -> f64 {
        self.land.sum()
    }

    #[inline]
    fn wrap_x(&self, x: i64) -> usize {
        let w = self.width() as i64;
        x.rem_euclid(w) as usize
    }

    /// Resolve the neighbor of `(x, y)` at relative offset `(dx, dy)`.
    ///
    /// The x axis is cyclic. Out-of-range y resolves to a virtual padding
    /// cell: rows beyond y < 0 sit `edge_offset` below the adjacent edge row
    /// (a permanent sink, so the gradient points outward from inside), rows
    /// beyond y = height - 1 sit `edge_offset` above it (a barrier, so water
    /// never flows in from beyond that edge). The fixed offset only
    /// guarantees an outward gradient relative to the edge row itself; under
    /// terrain whose local variance dwarfs the offset the one-way intent can
    /// be violated. That is a model-fidelity caveat, not something this
    /// accessor corrects.
    pub fn neighbor(&self, x: usize, y: usize, dx: i32, dy: i32) -> Site {
        debug_assert!(x < self.width() && y < self.height());
        let nx = self.wrap_x(x as i64 + i64::from(dx));
        let ny = y as i64 + i64::from(dy);
        if ny < 0 {
            Site::Virtual {
                height: self.height_at(nx, 0) - self.edge_offset,
            }
        } else if ny >= self.height() as i64 {
            Site::Virtual {
                height: self.height_at(nx, self.height() - 1) + self.edge_offset,
            }
        } else {
            Site::Real { x: nx, y: ny as usize }
        }
    }

    /// Resolve all 8 neighbors of `(x, y)` in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors8(&self, x: usize, y: usize) -> [Site; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.neighbor(x, y, dx, dy))
    }

    /// Land height of a resolved site.
    pub fn height_of(&self, site: &Site) -> f64 {
        match *site {
            Site::Real { x, y } => self.height_at(x, y),
            Site::Virtual { height } => height,
        }
    }

    /// Water depth of a resolved site. Virtual sites are always dry.
    pub fn water_of(&self, site: &Site) -> f64 {
        match *site {
            Site::Real { x, y } => self.water_at(x, y),
            Site::Virtual { .. } => 0.0,
        }
    }

    /// Surface height of a resolved site.
    pub fn surface_of(&self, site: &Site) -> f64 {
        match *site {
            Site::Real { x, y } => self.surface_at(x, y),
            Site::Virtual { height } => height,
        }
    }

    /// Add water to a resolved site. Returns whether the deposit was
    /// retained; deposits to virtual sites are silently discarded.
    pub fn deposit(&mut self, site: &Site, amount: f64) -> bool {
        match *site {
            Site::Real { x, y } => {
                self.add_water(x, y, amount);
                true
            }
            Site::Virtual { .. } => false,
        }
    }
}
