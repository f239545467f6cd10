use rand::rngs::StdRng;
use tw_grid::TerrainGrid;

use crate::clock::StepClock;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to each system during a step.
///
/// Systems receive the grid and random stream by reference for the duration
/// of one tick only; nothing here may be retained beyond the call.
pub struct SimContext<'a> {
    /// The terrain grid being simulated.
    pub grid: &'a mut TerrainGrid,
    /// Read-only view of the step clock.
    pub clock: &'a StepClock,
    /// Diagnostic event log.
    pub events: &'a mut EventLog,
    /// The run's single seeded random stream.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// The current step number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}
