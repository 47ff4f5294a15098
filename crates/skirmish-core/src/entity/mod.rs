//! Entity kinds and the capability set they share.
//!
//! This module provides:
//! - [`EntityKind`]: tag for the six concrete kinds
//! - [`SpaceEntity`]: the behavior every kind implements
//! - [`Entity`]: closed enum the [`Arena`] stores, delegating to its variant
//!
//! # Architecture
//!
//! Each kind composes one motion provider from [`crate::motion`] plus its own
//! state. Behavior that touches other entities (sweeps, spawning, area damage)
//! goes through the `&mut Arena` every mutating method receives. The arena
//! checks the acting entity out of storage for the duration of the call, so
//! an entity never observes itself through a query.
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use skirmish_core::entity::{CargoShip, SpaceEntity};
//! use skirmish_core::geometry::WorldBounds;
//! use skirmish_core::identity::Side;
//!
//! let mut arena = Arena::with_seed(WorldBounds::default(), 7);
//! let ship = CargoShip::new(Side::Cyan, 5.0, 1000.0, 3, &mut arena).unwrap();
//! let id = arena.admit(ship);
//!
//! assert!(arena.get(&id).is_some_and(|e| e.is_ship()));
//! ```

pub mod cargo_ship;
pub mod components;
pub mod debris_cloud;
pub mod fighter_ship;
pub mod guided_missile;
pub mod rail_gun_bolt;
pub mod space_port;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::error::SimError;
use crate::geometry::{format_point, Point3D, Polygon};
use crate::identity::{EntityId, Identity, Side};
use crate::render::{Category, RenderSnapshot};

pub use cargo_ship::CargoShip;
pub use components::{CombatState, DamageOutcome, StatusFlags};
pub use debris_cloud::{CloudProfile, DebrisCloud};
pub use fighter_ship::FighterShip;
pub use guided_missile::{GuidedMissile, MissileProfile};
pub use rail_gun_bolt::{BoltProfile, RailGunBolt};
pub use space_port::SpacePort;

// =============================================================================
// Entity Kind
// =============================================================================

/// Concrete entity kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Unarmed freighter that drops decoys and repairs at its station.
    CargoShip,
    /// Missile-armed fighter.
    FighterShip,
    /// Slow station armed with rail guns.
    SpacePort,
    /// Homing missile.
    GuidedMissile,
    /// Unguided rail gun round.
    RailGunBolt,
    /// Short-lived cloud: decoy, splash or wreck.
    DebrisCloud,
}

impl EntityKind {
    /// Label used in entity ids.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CargoShip => "Cargo Ship",
            Self::FighterShip => "Fighter Ship",
            Self::SpacePort => "Space Port",
            Self::GuidedMissile => "Guided Missile",
            Self::RailGunBolt => "Rail Gun Bolt",
            Self::DebrisCloud => "Debris Cloud",
        }
    }

    /// True for cargo and fighter ships.
    #[must_use]
    pub const fn is_ship(self) -> bool {
        matches!(self, Self::CargoShip | Self::FighterShip)
    }

    /// True for missiles and bolts.
    #[must_use]
    pub const fn is_projectile(self) -> bool {
        matches!(self, Self::GuidedMissile | Self::RailGunBolt)
    }

    /// Population class, if this kind is counted.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            Self::CargoShip | Self::FighterShip => Some(Category::Ships),
            Self::SpacePort => Some(Category::Ports),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Space Entity
// =============================================================================

/// Capability set shared by every entity kind.
pub trait SpaceEntity {
    /// Side and id.
    fn identity(&self) -> &Identity;

    /// Unique id.
    fn id(&self) -> &EntityId {
        self.identity().id()
    }

    /// Owning side.
    fn side(&self) -> Side {
        self.identity().side()
    }

    /// Concrete kind.
    fn kind(&self) -> EntityKind;

    /// Current position.
    fn location(&self) -> Point3D;

    /// Current goal.
    fn destination(&self) -> Point3D;

    /// Heading in radians.
    fn heading(&self) -> f64;

    /// Distance per unit time.
    fn speed(&self) -> f64;

    /// Advances by `dt`, possibly interacting with the arena.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInterval`] for a negative `dt`; the entity
    /// is left where it was.
    fn move_by(&mut self, dt: f64, arena: &mut Arena) -> Result<(), SimError>;

    /// Per-tick behavior after moving.
    fn update(&mut self, arena: &mut Arena);

    /// True when the motion provider has nothing left to do.
    fn at_destination(&self) -> bool;

    /// Picks a new destination after arrival. No-op for kinds that do not roam.
    fn reroute(&mut self, _arena: &mut Arena) {}

    /// Terminal flag; the sweep removes destroyed entities.
    fn is_destroyed(&self) -> bool;

    /// True once the entity has lost strength.
    fn is_damaged(&self) -> bool;

    /// Receives damage. Ignored once destroyed.
    fn apply_damage(&mut self, amount: f64, arena: &mut Arena);

    /// Reacts to being locked by an attacker at `attacker`.
    fn react_to_radar_lock(&mut self, _attacker: Point3D, _arena: &mut Arena) {}

    /// True for cargo and fighter ships.
    fn is_ship(&self) -> bool {
        self.kind().is_ship()
    }

    /// True for space ports.
    fn is_port(&self) -> bool {
        self.kind() == EntityKind::SpacePort
    }

    /// True if radar may lock onto this entity.
    fn is_targetable(&self) -> bool;

    /// Outline in local coordinates.
    fn shape(&self) -> &Polygon;

    /// Multi-line description.
    fn status_text(&self) -> String;

    /// Render snapshot of the current state.
    fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            id: self.id().clone(),
            kind: self.kind(),
            side: self.side(),
            location: self.location(),
            heading: self.heading(),
            shape: self.shape().clone(),
            status: self.status_text(),
            destroyed: self.is_destroyed(),
            damaged: self.is_damaged(),
        }
    }
}

/// Common status lines: id, motion and combat readouts.
pub(crate) fn status_header<E: SpaceEntity + ?Sized>(entity: &E, combat: &CombatState) -> String {
    format!(
        "ID: {}\nLocation: {}\nDestination: {}\nSpeed: {:.2}\nAngle: {:.2}\nDamaged: {}\nStrength: {:.2}\nMax Strength: {:.2}",
        entity.id(),
        format_point(entity.location()),
        format_point(entity.destination()),
        entity.speed(),
        entity.heading(),
        entity.is_damaged(),
        combat.strength,
        combat.max_strength,
    )
}

// =============================================================================
// Entity
// =============================================================================

/// Any entity the arena can hold.
#[derive(Debug)]
pub enum Entity {
    /// Cargo ship.
    CargoShip(CargoShip),
    /// Fighter ship.
    FighterShip(FighterShip),
    /// Space port.
    SpacePort(SpacePort),
    /// Guided missile.
    GuidedMissile(GuidedMissile),
    /// Rail gun bolt.
    RailGunBolt(RailGunBolt),
    /// Debris cloud.
    DebrisCloud(DebrisCloud),
}

macro_rules! entity_conversions {
    ($($variant:ident => $as_ref:ident, $as_mut:ident;)*) => {
        $(
            impl From<$variant> for Entity {
                fn from(inner: $variant) -> Self {
                    Self::$variant(inner)
                }
            }
        )*

        impl Entity {
            $(
                #[doc = concat!("Returns the inner `", stringify!($variant), "`, if this is one.")]
                #[must_use]
                pub fn $as_ref(&self) -> Option<&$variant> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                #[doc = concat!("Returns the inner `", stringify!($variant), "` mutably, if this is one.")]
                pub fn $as_mut(&mut self) -> Option<&mut $variant> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }
    };
}

entity_conversions! {
    CargoShip => as_cargo_ship, as_cargo_ship_mut;
    FighterShip => as_fighter_ship, as_fighter_ship_mut;
    SpacePort => as_space_port, as_space_port_mut;
    GuidedMissile => as_guided_missile, as_guided_missile_mut;
    RailGunBolt => as_rail_gun_bolt, as_rail_gun_bolt_mut;
    DebrisCloud => as_debris_cloud, as_debris_cloud_mut;
}

impl Entity {
    fn inner(&self) -> &dyn SpaceEntity {
        match self {
            Self::CargoShip(e) => e,
            Self::FighterShip(e) => e,
            Self::SpacePort(e) => e,
            Self::GuidedMissile(e) => e,
            Self::RailGunBolt(e) => e,
            Self::DebrisCloud(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SpaceEntity {
        match self {
            Self::CargoShip(e) => e,
            Self::FighterShip(e) => e,
            Self::SpacePort(e) => e,
            Self::GuidedMissile(e) => e,
            Self::RailGunBolt(e) => e,
            Self::DebrisCloud(e) => e,
        }
    }
}

impl SpaceEntity for Entity {
    fn identity(&self) -> &Identity {
        self.inner().identity()
    }

    fn kind(&self) -> EntityKind {
        match self {
            Self::CargoShip(_) => EntityKind::CargoShip,
            Self::FighterShip(_) => EntityKind::FighterShip,
            Self::SpacePort(_) => EntityKind::SpacePort,
            Self::GuidedMissile(_) => EntityKind::GuidedMissile,
            Self::RailGunBolt(_) => EntityKind::RailGunBolt,
            Self::DebrisCloud(_) => EntityKind::DebrisCloud,
        }
    }

    fn location(&self) -> Point3D {
        self.inner().location()
    }

    fn destination(&self) -> Point3D {
        self.inner().destination()
    }

    fn heading(&self) -> f64 {
        self.inner().heading()
    }

    fn speed(&self) -> f64 {
        self.inner().speed()
    }

    fn move_by(&mut self, dt: f64, arena: &mut Arena) -> Result<(), SimError> {
        self.inner_mut().move_by(dt, arena)
    }

    fn update(&mut self, arena: &mut Arena) {
        self.inner_mut().update(arena);
    }

    fn at_destination(&self) -> bool {
        self.inner().at_destination()
    }

    fn reroute(&mut self, arena: &mut Arena) {
        self.inner_mut().reroute(arena);
    }

    fn is_destroyed(&self) -> bool {
        self.inner().is_destroyed()
    }

    fn is_damaged(&self) -> bool {
        self.inner().is_damaged()
    }

    fn apply_damage(&mut self, amount: f64, arena: &mut Arena) {
        self.inner_mut().apply_damage(amount, arena);
    }

    fn react_to_radar_lock(&mut self, attacker: Point3D, arena: &mut Arena) {
        self.inner_mut().react_to_radar_lock(attacker, arena);
    }

    fn is_targetable(&self) -> bool {
        self.inner().is_targetable()
    }

    fn shape(&self) -> &Polygon {
        self.inner().shape()
    }

    fn status_text(&self) -> String {
        self.inner().status_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WorldBounds;

    mod kind_tests {
        use super::*;

        #[test]
        fn classification() {
            assert!(EntityKind::CargoShip.is_ship());
            assert!(EntityKind::FighterShip.is_ship());
            assert!(!EntityKind::SpacePort.is_ship());
            assert!(EntityKind::GuidedMissile.is_projectile());
            assert!(EntityKind::RailGunBolt.is_projectile());
            assert!(!EntityKind::DebrisCloud.is_projectile());
        }

        #[test]
        fn only_ships_and_ports_are_counted() {
            assert_eq!(EntityKind::FighterShip.category(), Some(Category::Ships));
            assert_eq!(EntityKind::SpacePort.category(), Some(Category::Ports));
            assert_eq!(EntityKind::DebrisCloud.category(), None);
            assert_eq!(EntityKind::GuidedMissile.category(), None);
        }
    }

    mod entity_tests {
        use super::*;

        #[test]
        fn enum_delegates_to_variant() {
            let mut arena = Arena::with_seed(WorldBounds::default(), 11);
            let port = SpacePort::new(Side::Red, 0.025, 2500.0, 100, &mut arena).unwrap();
            let id = port.id().clone();
            let location = port.location();
            let entity = Entity::from(port);

            assert_eq!(entity.kind(), EntityKind::SpacePort);
            assert_eq!(entity.id(), &id);
            assert_eq!(entity.location(), location);
            assert!(entity.is_port());
            assert!(!entity.is_ship());
            assert!(entity.as_space_port().is_some());
            assert!(entity.as_cargo_ship().is_none());
        }

        #[test]
        fn snapshot_reflects_state() {
            let mut arena = Arena::with_seed(WorldBounds::default(), 12);
            let ship = CargoShip::new(Side::Cyan, 5.0, 1000.0, 2, &mut arena).unwrap();
            let snapshot = Entity::from(ship).snapshot();

            assert_eq!(snapshot.kind, EntityKind::CargoShip);
            assert_eq!(snapshot.side, Side::Cyan);
            assert!(!snapshot.destroyed);
            assert!(!snapshot.damaged);
            assert_eq!(snapshot.shape.len(), 4);
            assert!(snapshot.status.starts_with("ID: CYAN Cargo Ship "));
        }
    }
}
