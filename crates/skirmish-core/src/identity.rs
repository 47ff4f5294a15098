//! Side palette and entity identity allocation.
//!
//! Every entity carries an [`Identity`]: its side (which doubles as its
//! render color) and a process-unique id of the form `"{SIDE} {Kind} {n}"`.
//! The numeric suffix comes from a single counter shared by all kinds, so ids
//! never repeat within a process.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::SimError;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Side
// =============================================================================

/// A faction. The fixed palette doubles as the render color set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Blue faction.
    Blue,
    /// Red faction.
    Red,
    /// Gray, used for decoy clouds.
    Gray,
    /// Orange faction.
    Orange,
    /// Yellow, used for splash and wreck clouds.
    Yellow,
    /// Cyan faction.
    Cyan,
    /// Magenta faction.
    Magenta,
    /// Green faction.
    Green,
}

impl Side {
    /// Every side in palette order.
    pub const ALL: [Side; 8] = [
        Side::Blue,
        Side::Red,
        Side::Gray,
        Side::Orange,
        Side::Yellow,
        Side::Cyan,
        Side::Magenta,
        Side::Green,
    ];

    /// Upper-case palette name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Side::Blue => "BLUE",
            Side::Red => "RED",
            Side::Gray => "GRAY",
            Side::Orange => "ORANGE",
            Side::Yellow => "YELLOW",
            Side::Cyan => "CYAN",
            Side::Magenta => "MAGENTA",
            Side::Green => "GREEN",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(SimError::MissingSide);
        }
        Side::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::UnknownSide(name.to_string()))
    }
}

// =============================================================================
// Entity Id
// =============================================================================

/// Unique, human-readable entity identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Returns the id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric suffix, if the id has one.
    #[must_use]
    pub fn serial(&self) -> Option<u64> {
        self.0.rsplit(' ').next().and_then(|n| n.parse().ok())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Side plus unique id, fixed for the lifetime of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: EntityId,
    side: Side,
}

impl Identity {
    /// Allocates a fresh id for an entity of `kind` on `side`.
    #[must_use]
    pub fn new(side: Side, kind: EntityKind) -> Self {
        let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self {
            id: EntityId(format!("{side} {} {serial}", kind.label())),
            side,
        }
    }

    /// Returns the id.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the side.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }
}
