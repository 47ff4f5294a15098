//! Scenario, determinism and property tests.
//!
//! # Test Structure
//!
//! - `helpers.rs`: factory functions for arenas and placed entities
//! - `integration.rs`: end-to-end battle scenarios
//! - `determinism.rs`: same seed, same battle
//! - `properties.rs`: proptest properties for motion and combat state

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
