//! Error types for entity construction, movement and configuration.
//!
//! Construction and movement failures are recoverable: the arena logs them
//! and skips the offending entity rather than aborting the battle.

use thiserror::Error;

/// Validation failures raised by entity constructors and motion providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A real-valued input was negative or not a number.
    #[error("invalid value for {field}: {value}")]
    InvalidNumeric {
        /// Name of the rejected input.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The requested side is not part of the palette.
    #[error("unknown side '{0}'")]
    UnknownSide(String),

    /// No side was supplied.
    #[error("side is required")]
    MissingSide,

    /// A movement time step was negative.
    #[error("invalid movement interval: {0}")]
    InvalidInterval(f64),
}

/// Failures while loading or validating a [`SimConfig`](crate::config::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// World extents must be positive and finite.
    #[error("world bounds must be positive, got {x} x {y} x {z}")]
    InvalidBounds {
        /// Extent along x.
        x: f64,
        /// Extent along y.
        y: f64,
        /// Extent along z.
        z: f64,
    },

    /// The tick interval must be at least one millisecond.
    #[error("tick interval must be at least 1 ms")]
    InvalidTickInterval,

    /// The per-tick time step must be non-negative and finite.
    #[error("time step must be non-negative, got {0}")]
    InvalidTimeStep(f64),
}

/// Rejects negative or NaN reals, returning the value otherwise.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, SimError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidNumeric { field, value })
    }
}
