//! # Skirmish Core
//!
//! Tick-driven 3D space skirmish simulation.
//!
//! Two or more sides field cargo ships, fighters and space ports inside a
//! bounded volume. Every tick each entity moves, reacts to its surroundings
//! and may spawn missiles, rail gun bolts or debris clouds. Destroyed entities
//! are reported once more and then removed.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): six concrete kinds behind one capability trait,
//!   each composed from a motion provider ([`motion`]) and its own state
//! - **Arena** ([`arena`]): entity registry, cross-entity queries and the
//!   per-tick sweep
//! - **Simulation** ([`simulation`]): fixed-rate tick loop with pause/stop
//! - **Render** ([`render`]): snapshots and summaries pushed to a sink
//!
//! ## Usage
//!
//! ```rust
//! use skirmish_core::{FrameBuffer, SimConfig, Simulation};
//!
//! let config = SimConfig { seed: Some(1), ..SimConfig::default() };
//! let mut sim = Simulation::new(&config)?;
//! let mut frames = FrameBuffer::new();
//! sim.run_for(100, &mut frames);
//! println!("{}", frames.summary());
//! # Ok::<(), skirmish_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod motion;
pub mod render;
pub mod simulation;

pub use arena::Arena;
pub use config::{SideLoadout, SimConfig};
pub use entity::{Entity, EntityKind, SpaceEntity};
pub use error::{ConfigError, SimError};
pub use geometry::{Point3D, Polygon, WorldBounds};
pub use identity::{EntityId, Side};
pub use render::{FrameBuffer, PopulationSummary, RenderSink, RenderSnapshot};
pub use simulation::{SimControl, Simulation};

#[cfg(test)]
mod tests;
