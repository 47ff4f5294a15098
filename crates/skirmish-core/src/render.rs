//! Render-facing output of the tick sweep.
//!
//! The simulation never draws anything itself. After each entity is processed
//! it pushes a [`RenderSnapshot`] into a [`RenderSink`], and after every sweep
//! it pushes the [`PopulationSummary`]. Sinks decide what to do with them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::geometry::{Point3D, Polygon};
use crate::identity::{EntityId, Side};

/// Per-entity frame data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Side, which is also the draw color.
    pub side: Side,
    /// Position in battle space.
    pub location: Point3D,
    /// Heading in radians.
    pub heading: f64,
    /// Outline in local coordinates.
    pub shape: Polygon,
    /// Multi-line description for info panels.
    pub status: String,
    /// Set on the final snapshot of a destroyed entity.
    pub destroyed: bool,
    /// True once the entity has taken damage.
    pub damaged: bool,
}

impl RenderSnapshot {
    /// Outline in screen space for a view whose depth axis spans `z_extent`.
    ///
    /// Nearer entities (larger z) draw larger.
    #[must_use]
    pub fn screen_polygon(&self, z_extent: f64) -> Polygon {
        let depth_scale = if z_extent > 0.0 {
            self.location.z / z_extent + 0.2
        } else {
            1.0
        };
        self.shape
            .scaled(depth_scale)
            .rotated(self.heading)
            .translated(self.location.x, self.location.y)
    }
}

// =============================================================================
// Population Summary
// =============================================================================

/// Counted population classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Cargo and fighter ships.
    Ships,
    /// Space ports.
    Ports,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ships => write!(f, "Ships"),
            Self::Ports => write!(f, "Ports"),
        }
    }
}

/// Live ship and port counts per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationSummary {
    counts: BTreeMap<(Side, Category), usize>,
}

impl PopulationSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count for a side and class.
    #[must_use]
    pub fn count(&self, side: Side, category: Category) -> usize {
        self.counts.get(&(side, category)).copied().unwrap_or(0)
    }

    /// Iterates counts in side order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, Category, usize)> + '_ {
        self.counts.iter().map(|(&(side, category), &n)| (side, category, n))
    }

    pub(crate) fn increment(&mut self, side: Side, category: Category) {
        *self.counts.entry((side, category)).or_insert(0) += 1;
    }

    pub(crate) fn decrement(&mut self, side: Side, category: Category) {
        if let Some(n) = self.counts.get_mut(&(side, category)) {
            *n = n.saturating_sub(1);
        }
    }
}

impl fmt::Display for PopulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (side, category, n) in self.iter() {
            write!(f, "{side} {category}: {n} ")?;
        }
        Ok(())
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Consumer of sweep output.
pub trait RenderSink {
    /// Receives one entity snapshot.
    fn update_item(&mut self, item: RenderSnapshot);
    /// Receives the summary emitted at the end of a sweep.
    fn update_info(&mut self, summary: &PopulationSummary);
}

/// In-memory sink that keeps the most recently completed frame.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    pending: Vec<RenderSnapshot>,
    frame: Vec<RenderSnapshot>,
    summary: PopulationSummary,
    frames: u64,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots of the last completed sweep.
    #[must_use]
    pub fn frame(&self) -> &[RenderSnapshot] {
        &self.frame
    }

    /// Summary of the last completed sweep.
    #[must_use]
    pub fn summary(&self) -> &PopulationSummary {
        &self.summary
    }

    /// Number of completed sweeps seen.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Finds a snapshot in the last frame.
    #[must_use]
    pub fn item(&self, id: &EntityId) -> Option<&RenderSnapshot> {
        self.frame.iter().find(|s| &s.id == id)
    }
}

impl RenderSink for FrameBuffer {
    fn update_item(&mut self, item: RenderSnapshot) {
        self.pending.push(item);
    }

    fn update_info(&mut self, summary: &PopulationSummary) {
        self.frame = std::mem::take(&mut self.pending);
        self.summary = summary.clone();
        self.frames += 1;
    }
}
