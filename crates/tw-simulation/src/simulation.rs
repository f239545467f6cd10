use rand::SeedableRng;
use rand::rngs::StdRng;
use tw_grid::TerrainGrid;

use crate::clock::StepClock;
use crate::config::{InitialCondition, SimConfig};
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::EventLog;
use crate::flow::FlowSystem;
use crate::precipitation::PrecipitationSystem;
use crate::random::RandomSource;
use crate::snapshot::Snapshot;
use crate::system::System;

/// The top-level simulation driver.
///
/// Owns the grid, clock, random stream, event log, and registered systems.
/// Runs strictly sequentially: within one step the precipitation system
/// ticks first, then the flow system sweeps the grid, and later flow calls
/// observe the effects of earlier ones.
pub struct Simulation {
    config: SimConfig,
    grid: TerrainGrid,
    clock: StepClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("grid", &(self.grid.width(), self.grid.height()))
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Build a simulation from a validated configuration.
    ///
    /// Fails with a configuration error before any simulation state is
    /// created; on success the grid is seeded with the configured initial
    /// condition and the precipitation and flow systems are registered, in
    /// that order.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut grid = TerrainGrid::new(
            config.width,
            config.height,
            config.initial_land_height,
            config.precipitation_unit,
        );
        seed_terrain(
            &mut grid,
            config.initial_condition,
            config.precipitation_unit,
            &mut rng,
        );

        let mut sim = Self {
            grid,
            clock: StepClock::new(),
            rng,
            events: EventLog::new(config.max_events),
            systems: Vec::new(),
            config,
        };
        sim.add_system(PrecipitationSystem::new(sim.config.precipitation_unit))?;
        sim.add_system(FlowSystem::new(
            sim.config.erosion_rate,
            sim.config.flow_passes,
        ))?;
        Ok(sim)
    }

    /// Register a system and run its init hook. Systems tick in
    /// registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SimResult<()> {
        let mut system = Box::new(system);
        let mut ctx = SimContext {
            grid: &mut self.grid,
            clock: &self.clock,
            events: &mut self.events,
            rng: &mut self.rng,
        };
        system.init(&mut ctx)?;
        self.systems.push(system);
        Ok(())
    }

    /// Advance the simulation by one step: one precipitation application,
    /// then the configured number of flow sweeps.
    pub fn step(&mut self) -> SimResult<()> {
        self.clock.advance();
        for system in &mut self.systems {
            let mut ctx = SimContext {
                grid: &mut self.grid,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            system.tick(&mut ctx)?;
        }
        Ok(())
    }

    /// Run `iterations` steps, collecting one snapshot per step.
    pub fn run(&mut self, iterations: u64) -> SimResult<Vec<Snapshot>> {
        let mut snapshots = Vec::with_capacity(iterations as usize);
        self.run_with(iterations, |snapshot| snapshots.push(snapshot))?;
        Ok(snapshots)
    }

    /// Run `iterations` steps, streaming one snapshot per step to `record`
    /// instead of accumulating them, so long runs need not hold every
    /// snapshot in memory.
    pub fn run_with<F>(&mut self, iterations: u64, mut record: F) -> SimResult<()>
    where
        F: FnMut(Snapshot),
    {
        for _ in 0..iterations {
            self.step()?;
            record(Snapshot::capture(self.clock.tick(), &self.grid));
        }
        Ok(())
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The terrain grid.
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Mutable access to the terrain grid, for scenario setup.
    pub fn grid_mut(&mut self) -> &mut TerrainGrid {
        &mut self.grid
    }

    /// The step clock.
    pub fn clock(&self) -> &StepClock {
        &self.clock
    }

    /// The diagnostic event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The current step number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Extract the grid, consuming the simulation.
    pub fn into_grid(self) -> TerrainGrid {
        self.grid
    }
}

/// Apply the configured initial land shape, drawing offsets from the run's
/// seeded stream.
fn seed_terrain<R: RandomSource>(
    grid: &mut TerrainGrid,
    condition: InitialCondition,
    unit: f64,
    rng: &mut R,
) {
    match condition {
        InitialCondition::Flat => {}
        InitialCondition::Random => {
            for y in 0..grid.height() {
                for x in 0..grid.width() {
                    let offset = (rng.sample_unit() * 2.0 - 1.0) * unit;
                    grid.add_height(x, y, offset);
                }
            }
        }
        InitialCondition::Sloped => {
            for y in 0..grid.height() {
                let offset = unit * (y as f64 + 1.0);
                for x in 0..grid.width() {
                    grid.add_height(x, y, offset);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn small_config() -> SimConfig {
        SimConfig::default()
            .with_dimensions(8, 6)
            .with_erosion_rate(0.2)
            .with_flow_passes(2)
    }

    #[test]
    fn invalid_config_fails_before_state_exists() {
        let err = Simulation::new(SimConfig::default().with_dimensions(0, 5));
        assert!(matches!(err, Err(SimError::InvalidDimensions { .. })));
    }

    #[test]
    fn flat_start_leaves_land_at_base_height() {
        let sim = Simulation::new(small_config().with_initial_land_height(3.0)).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(sim.grid().height_at(x, y), 3.0);
                assert_eq!(sim.grid().water_at(x, y), 0.0);
            }
        }
    }

    #[test]
    fn random_start_offsets_stay_within_one_unit() {
        let config = small_config()
            .with_initial_land_height(2.0)
            .with_precipitation_unit(0.5)
            .with_initial_condition(InitialCondition::Random);
        let sim = Simulation::new(config).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                let h = sim.grid().height_at(x, y);
                assert!((1.5..=2.5).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn sloped_start_rises_one_unit_per_row() {
        let config = small_config().with_initial_condition(InitialCondition::Sloped);
        let sim = Simulation::new(config).unwrap();
        for y in 0..6 {
            let expected = (y as f64 + 1.0) * sim.config().precipitation_unit;
            for x in 0..8 {
                assert_eq!(sim.grid().height_at(x, y), expected);
            }
        }
    }

    #[test]
    fn run_yields_one_snapshot_per_iteration() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let snapshots = sim.run(5).unwrap();
        assert_eq!(snapshots.len(), 5);
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.tick, i as u64 + 1);
        }
        assert_eq!(sim.current_tick(), 5);
    }

    #[test]
    fn run_zero_iterations_yields_nothing() {
        let mut sim = Simulation::new(small_config()).unwrap();
        assert!(sim.run(0).unwrap().is_empty());
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn run_with_streams_instead_of_accumulating() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let mut seen = 0u64;
        sim.run_with(4, |snapshot| {
            seen += 1;
            assert_eq!(snapshot.tick, seen);
        })
        .unwrap();
        assert_eq!(seen, 4);
    }

    #[test]
    fn identical_seeds_reproduce_identical_snapshots() {
        let run = || {
            let mut sim = Simulation::new(small_config().with_seed(123)).unwrap();
            sim.run(5).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn snapshots_are_independent_of_later_mutation() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let snapshots = sim.run(1).unwrap();
        let land_before = snapshots[0].land.clone();
        sim.grid_mut().set_height(0, 0, 1234.5);
        assert_eq!(snapshots[0].land, land_before);
    }

    #[test]
    fn water_stays_non_negative_and_flux_never_shrinks() {
        let mut sim = Simulation::new(small_config().with_seed(7)).unwrap();
        let snapshots = sim.run(10).unwrap();

        for y in 0..6 {
            for x in 0..8 {
                assert!(sim.grid().water_at(x, y) >= 0.0);
            }
        }
        for pair in snapshots.windows(2) {
            for (earlier, later) in pair[0]
                .flux
                .as_slice()
                .iter()
                .zip(pair[1].flux.as_slice())
            {
                assert!(later >= earlier);
            }
        }
    }

    #[test]
    fn default_systems_are_registered_in_order() {
        let sim = Simulation::new(small_config()).unwrap();
        assert!(sim.get_system::<PrecipitationSystem>().is_some());
        assert!(sim.get_system::<FlowSystem>().is_some());
    }

    #[test]
    fn precipitation_events_appear_during_a_run() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.run(3).unwrap();
        let rain_events = sim
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e.kind, crate::event::SimEventKind::Precipitation { .. }))
            .count();
        assert_eq!(rain_events, 3);
    }

    #[test]
    fn into_grid_preserves_final_state() {
        let mut sim = Simulation::new(small_config().with_seed(9)).unwrap();
        sim.run(2).unwrap();
        let expected_water = sim.grid().total_water();
        let grid = sim.into_grid();
        assert_eq!(grid.total_water(), expected_water);
        assert_eq!((grid.width(), grid.height()), (8, 6));
    }
}
