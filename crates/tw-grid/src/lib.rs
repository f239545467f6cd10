//! Core grid model for Talweg: scalar fields, boundary-aware sites, and the
//! terrain grid.
//!
//! This crate defines the data the simulation engine mutates. It knows
//! nothing about precipitation or flow ordering — you can construct a
//! [`TerrainGrid`] programmatically and inspect it without pulling in the
//! engine.

/// The terrain grid owning the land, water, and flow-accumulation maps.
pub mod grid;
/// Row-major scalar fields.
pub mod map;
/// Neighbor offsets and the real/virtual site descriptor.
pub mod site;

/// Re-export of [`grid::TerrainGrid`].
pub use grid::TerrainGrid;
/// Re-export of [`map::ScalarMap`].
pub use map::ScalarMap;
/// Re-exports of [`site::Site`] and [`site::NEIGHBOR_OFFSETS`].
pub use site::{NEIGHBOR_OFFSETS, Site};
