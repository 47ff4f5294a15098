//! Shared component state for entity kinds.
//!
//! [`CombatState`] holds strength bookkeeping for everything that can be
//! damaged. Damage to a destroyed hull is ignored, so death side-effects fire
//! exactly once.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, SimError};

bitflags! {
    /// Status flags carried by combat state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Strength has dropped below max at least once. Never cleared.
        const DAMAGED = 1 << 0;
        /// Terminal; the sweep removes the entity.
        const DESTROYED = 1 << 1;
        /// A cargo ship sitting at its station for repairs.
        const DOCKED = 1 << 2;
    }
}

/// Result of applying damage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The hull was already destroyed; nothing changed.
    Ignored,
    /// Strength dropped but the hull survives.
    Absorbed,
    /// This hit destroyed the hull.
    Destroyed,
}

/// Strength, max strength and status flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current strength, never negative.
    pub strength: f64,
    /// Strength cap for repairs.
    pub max_strength: f64,
    /// Status flags.
    pub status_flags: StatusFlags,
}

impl CombatState {
    /// Full-strength state.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative strength.
    pub fn new(max_strength: f64) -> Result<Self, SimError> {
        let max_strength = non_negative("max_strength", max_strength)?;
        Ok(Self {
            strength: max_strength,
            max_strength,
            status_flags: StatusFlags::empty(),
        })
    }

    /// Subtracts `amount`, clamping at zero. Negative or NaN amounts count as zero.
    pub fn take_damage(&mut self, amount: f64) -> DamageOutcome {
        if self.is_destroyed() {
            return DamageOutcome::Ignored;
        }
        let health = self.strength - amount.max(0.0);
        if health <= 0.0 {
            self.strength = 0.0;
            self.status_flags
                .insert(StatusFlags::DESTROYED | StatusFlags::DAMAGED);
            return DamageOutcome::Destroyed;
        }
        self.strength = health;
        if self.strength < self.max_strength {
            self.status_flags.insert(StatusFlags::DAMAGED);
        }
        DamageOutcome::Absorbed
    }

    /// Adds `amount`, capped at max strength.
    pub fn repair(&mut self, amount: f64) {
        self.strength = (self.strength + amount).min(self.max_strength);
    }

    /// Marks the hull destroyed without a damage hit. Strength drops to zero.
    ///
    /// Returns false if it was already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.strength = 0.0;
        self.status_flags
            .insert(StatusFlags::DESTROYED | StatusFlags::DAMAGED);
        true
    }

    /// True once destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.status_flags.contains(StatusFlags::DESTROYED)
    }

    /// True once damaged.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.status_flags.contains(StatusFlags::DAMAGED)
    }

    /// True below max strength.
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        self.strength < self.max_strength
    }
}
