//! Battle configuration.
//!
//! Configurations are plain serde structs. Every field has a default, so a
//! JSON file only needs to name what it changes:
//!
//! ```
//! use skirmish_core::config::SimConfig;
//!
//! let config = SimConfig::from_json(r#"{ "seed": 7, "tick_interval_ms": 40 }"#).unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.sides.len(), 2);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::WorldBounds;

/// Top-level battle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World volume.
    pub bounds: WorldBounds,
    /// Wall-clock period of one tick.
    pub tick_interval_ms: u64,
    /// Simulated time units per tick.
    pub time_step: f64,
    /// Fixed seed for a reproducible battle; entropy when absent.
    pub seed: Option<u64>,
    /// Starting fleets.
    pub sides: Vec<SideLoadout>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds: WorldBounds::default(),
            tick_interval_ms: 20,
            time_step: 1.0,
            seed: None,
            sides: vec![SideLoadout::new("CYAN"), SideLoadout::new("MAGENTA")],
        }
    }
}

impl SimConfig {
    /// Default configuration with the given bounds.
    #[must_use]
    pub fn with_bounds(x: f64, y: f64, z: f64) -> Self {
        Self {
            bounds: WorldBounds::new(x, y, z),
            ..Default::default()
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON (including negative
    /// counts) or a validation error from [`SimConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SimConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks bounds, tick interval and time step.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        if !(self.time_step.is_finite() && self.time_step >= 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        Ok(())
    }

    /// Tick period as a duration.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Starting fleet for one side.
///
/// `side` is matched case-insensitively against the palette when the fleet
/// is seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideLoadout {
    /// Palette name.
    pub side: String,
    /// Cargo ships to seed.
    pub cargo_ships: u32,
    /// Decoys carried by each cargo ship.
    pub decoys_per_ship: u32,
    /// Cargo ship speed.
    pub cargo_ship_speed: f64,
    /// Cargo ship max strength.
    pub cargo_ship_strength: f64,
    /// Space ports to seed.
    pub space_ports: u32,
    /// Bolts carried by each port.
    pub bolts_per_port: u32,
    /// Port drift speed.
    pub space_port_speed: f64,
    /// Port max strength.
    pub space_port_strength: f64,
    /// Fighters to seed.
    pub fighter_ships: u32,
    /// Missiles carried by each fighter.
    pub missiles_per_fighter: u32,
    /// Fighter speed.
    pub fighter_ship_speed: f64,
    /// Fighter max strength.
    pub fighter_ship_strength: f64,
}

impl SideLoadout {
    /// Standard fleet for `side`.
    #[must_use]
    pub fn new(side: impl Into<String>) -> Self {
        Self {
            side: side.into(),
            ..Default::default()
        }
    }
}

impl Default for SideLoadout {
    fn default() -> Self {
        Self {
            side: String::new(),
            cargo_ships: 3,
            decoys_per_ship: 100,
            cargo_ship_speed: 5.0,
            cargo_ship_strength: 1000.0,
            space_ports: 3,
            bolts_per_port: 100,
            space_port_speed: 0.025,
            space_port_strength: 2500.0,
            fighter_ships: 3,
            missiles_per_fighter: 100,
            fighter_ship_speed: 5.0,
            fighter_ship_strength: 1000.0,
        }
    }
}
