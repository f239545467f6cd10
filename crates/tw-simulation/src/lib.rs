//! Erosion and drainage-network simulation for Talweg.
//!
//! Provides a system-based engine operating on a [`tw_grid::TerrainGrid`]:
//! stochastic precipitation injects water, a randomized flow sweep
//! redistributes it downhill and erodes the land, and the driver records a
//! snapshot of the land and flow-accumulation maps after every step.
//! Rendering, export, and progress display are downstream consumers of the
//! snapshot sequence and live outside this crate.

/// Step counter for simulation runs.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each step.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Flow system: downhill water redistribution and erosion.
pub mod flow;
/// Precipitation system: stochastic water injection.
pub mod precipitation;
/// Randomness capability seam for systems and tests.
pub mod random;
/// Top-level simulation driver.
pub mod simulation;
/// Per-step copies of the observable maps.
pub mod snapshot;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-export of [`clock::StepClock`].
pub use clock::StepClock;
/// Re-exports of [`config::InitialCondition`] and [`config::SimConfig`].
pub use config::{InitialCondition, SimConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`flow::FlowSystem`].
pub use flow::FlowSystem;
/// Re-export of [`precipitation::PrecipitationSystem`].
pub use precipitation::PrecipitationSystem;
/// Re-export of [`random::RandomSource`].
pub use random::RandomSource;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`snapshot::Snapshot`].
pub use snapshot::Snapshot;
/// Re-export of [`system::System`].
pub use system::System;
