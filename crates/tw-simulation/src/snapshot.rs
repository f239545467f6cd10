use serde::{Deserialize, Serialize};
use tw_grid::{ScalarMap, TerrainGrid};

/// The observable state recorded after one step: deep copies of the land
/// and flow-accumulation maps.
///
/// Snapshots never alias live simulation state, so downstream consumers
/// (rendering, export) can hold them across further steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The step this snapshot was taken after.
    pub tick: u64,
    /// Land heights at the end of the step.
    pub land: ScalarMap,
    /// Cumulative outgoing flow at the end of the step.
    pub flux: ScalarMap,
}

impl Snapshot {
    /// Deep-copy the observable maps out of the grid.
    pub fn capture(tick: u64, grid: &TerrainGrid) -> Self {
        Self {
            tick,
            land: grid.land().clone(),
            flux: grid.flux().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_a_deep_copy() {
        let mut grid = TerrainGrid::new(3, 3, 1.0, 1.0);
        let snapshot = Snapshot::capture(7, &grid);
        grid.set_height(0, 0, 99.0);
        grid.add_flux(0, 0, 5.0);

        assert_eq!(snapshot.tick, 7);
        assert_eq!(snapshot.land.get(0, 0), 1.0);
        assert_eq!(snapshot.flux.get(0, 0), 0.0);
    }
}
