//! Test helper functions for setting up arenas and entities.
//!
//! Every spawn helper places the entity with its destination equal to its
//! location, so nothing drifts unless a test asks it to.

use crate::arena::Arena;
use crate::entity::{CargoShip, Entity, EntityKind, FighterShip, SpaceEntity, SpacePort};
use crate::geometry::{Point3D, WorldBounds};
use crate::identity::{EntityId, Side};

/// Standard 600-cube arena with a fixed seed.
pub fn test_arena(seed: u64) -> Arena {
    Arena::with_seed(WorldBounds::default(), seed)
}

/// Spawns a stationary cargo ship.
pub fn spawn_cargo_ship(arena: &mut Arena, side: Side, at: Point3D, decoys: u32) -> EntityId {
    let ship = CargoShip::new(side, 0.0, 1000.0, decoys, arena)
        .expect("valid cargo ship")
        .placed(at, at);
    arena.admit(ship)
}

/// Spawns a stationary fighter.
pub fn spawn_fighter(arena: &mut Arena, side: Side, at: Point3D, missiles: u32) -> EntityId {
    let fighter = FighterShip::new(side, 0.0, 1000.0, missiles, arena)
        .expect("valid fighter")
        .placed(at, at);
    arena.admit(fighter)
}

/// Spawns a stationary space port.
pub fn spawn_port(arena: &mut Arena, side: Side, at: Point3D, bolts: u32) -> EntityId {
    let port = SpacePort::new(side, 0.0, 2500.0, bolts, arena)
        .expect("valid space port")
        .placed(at, at);
    arena.admit(port)
}

/// Counts entities of one kind.
pub fn count_kind(arena: &Arena, kind: EntityKind) -> usize {
    arena.entities().filter(|e| e.kind() == kind).count()
}

/// Strength of a ship or port; panics for other kinds.
pub fn strength_of(arena: &Arena, id: &EntityId) -> f64 {
    match arena.get(id).expect("entity present") {
        Entity::CargoShip(ship) => ship.combat().strength,
        Entity::FighterShip(ship) => ship.combat().strength,
        Entity::SpacePort(port) => port.combat().strength,
        other => panic!("{} has no strength readout", other.kind()),
    }
}

/// True if the entity is present and destroyed.
pub fn is_destroyed(arena: &Arena, id: &EntityId) -> bool {
    arena.get(id).is_some_and(SpaceEntity::is_destroyed)
}
