//! Error types for the simulation crate.

/// Convenience result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while constructing a simulation.
///
/// All of these are configuration errors detected eagerly, before any
/// simulation state exists. Stepping a constructed simulation does not
/// fail: floating-point drift is clamped and degenerate neighborhoods are
/// normal code paths.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Grid dimensions must both be positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// The configured grid width.
        width: usize,
        /// The configured grid height.
        height: usize,
    },

    /// The erosion rate is a fraction of transported flow.
    #[error("erosion rate must be within [0, 1], got {0}")]
    ErosionRateOutOfRange(f64),

    /// Precipitation events must add a positive amount of water.
    #[error("precipitation unit must be positive, got {0}")]
    InvalidPrecipitationUnit(f64),

    /// At least one full flow pass must run per step.
    #[error("flow passes per step must be positive")]
    InvalidFlowPasses,
}
