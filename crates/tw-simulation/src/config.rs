use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Shape of the land surface before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialCondition {
    /// Uniform land at the configured base height.
    Flat,
    /// Base height plus, per site, a uniform offset within one
    /// precipitation unit either way.
    Random,
    /// Base height plus one precipitation unit per row index, a monotone
    /// gradient draining toward the sink edge.
    Sloped,
}

/// Configuration for a simulation run.
///
/// Validated eagerly by [`SimConfig::validate`] before any simulation state
/// is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed; identical seed and configuration reproduce a run exactly.
    pub seed: u64,
    /// Grid width in cells (the cyclic axis).
    pub width: usize,
    /// Grid height in cells (the bounded axis).
    pub height: usize,
    /// Fraction of transported flow lost to erosion and transport discount,
    /// in [0, 1].
    pub erosion_rate: f64,
    /// Baseline land height that initial conditions offset from.
    pub initial_land_height: f64,
    /// Water added per precipitation event; also the virtual padding offset.
    pub precipitation_unit: f64,
    /// Land surface shape before the first step.
    pub initial_condition: InitialCondition,
    /// Full-grid flow sweeps per precipitation event.
    pub flow_passes: u32,
    /// Maximum event log size (oldest events dropped when exceeded).
    /// 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 64,
            height: 48,
            erosion_rate: 0.1,
            initial_land_height: 0.0,
            precipitation_unit: 1.0,
            initial_condition: InitialCondition::Flat,
            flow_passes: 8,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the grid dimensions.
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the erosion rate.
    pub fn with_erosion_rate(mut self, rate: f64) -> Self {
        self.erosion_rate = rate;
        self
    }

    /// Set the baseline land height.
    pub fn with_initial_land_height(mut self, height: f64) -> Self {
        self.initial_land_height = height;
        self
    }

    /// Set the precipitation unit.
    pub fn with_precipitation_unit(mut self, unit: f64) -> Self {
        self.precipitation_unit = unit;
        self
    }

    /// Set the initial land surface shape.
    pub fn with_initial_condition(mut self, condition: InitialCondition) -> Self {
        self.initial_condition = condition;
        self
    }

    /// Set the number of flow sweeps per step.
    pub fn with_flow_passes(mut self, passes: u32) -> Self {
        self.flow_passes = passes;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Check every recognized option, rejecting the configuration before
    /// any state is built. NaN values fail the range checks.
    pub fn validate(&self) -> SimResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.erosion_rate) {
            return Err(SimError::ErosionRateOutOfRange(self.erosion_rate));
        }
        if !self.precipitation_unit.is_finite() || self.precipitation_unit <= 0.0 {
            return Err(SimError::InvalidPrecipitationUnit(self.precipitation_unit));
        }
        if self.flow_passes == 0 {
            return Err(SimError::InvalidFlowPasses);
        }
        Ok(())
    }
}
