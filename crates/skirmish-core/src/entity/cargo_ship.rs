//! Unarmed freighter.
//!
//! Cargo ships drop a decoy cloud each time radar locks them, and one more
//! when they die. Once damaged they head for the nearest friendly station,
//! dock, repair one point per tick and resume roaming at full strength.

use tracing::{debug, info, warn};

use super::components::{CombatState, DamageOutcome, StatusFlags};
use super::debris_cloud::{CloudProfile, DebrisCloud};
use super::{status_header, EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::SimError;
use crate::geometry::{Point3D, Polygon};
use crate::identity::{Identity, Side};
use crate::motion::{FreeRoam, Movable, PointSampler};

/// Distance at which a returning ship snaps onto its station.
pub const DOCKING_RANGE: f64 = 10.0;

/// Strength restored per tick while docked.
pub const REPAIR_PER_TICK: f64 = 1.0;

const HULL: [(f64, f64); 4] = [(0.0, -20.0), (12.0, 16.0), (0.0, 30.0), (-12.0, 16.0)];

/// Cargo ship state.
#[derive(Debug)]
pub struct CargoShip {
    identity: Identity,
    motion: FreeRoam,
    combat: CombatState,
    decoys: u32,
    shape: Polygon,
}

impl CargoShip {
    /// Creates a ship at a random location.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative speed or strength.
    pub fn new<S: PointSampler + ?Sized>(
        side: Side,
        speed: f64,
        max_strength: f64,
        decoys: u32,
        sampler: &mut S,
    ) -> Result<Self, SimError> {
        let motion = FreeRoam::new(speed, 0.0, sampler)?;
        let combat = CombatState::new(max_strength)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::CargoShip),
            motion,
            combat,
            decoys,
            shape: Polygon::from_points(&HULL),
        })
    }

    /// Moves the ship to `location`, heading for `destination`.
    #[must_use]
    pub fn placed(mut self, location: Point3D, destination: Point3D) -> Self {
        self.motion.place(location, destination);
        self
    }

    /// Decoys left.
    #[must_use]
    pub fn decoys(&self) -> u32 {
        self.decoys
    }

    /// Strength bookkeeping.
    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    /// True while sitting at a station for repairs.
    #[must_use]
    pub fn is_docked(&self) -> bool {
        self.combat.status_flags.contains(StatusFlags::DOCKED)
    }

    fn drop_decoy(&self, arena: &mut Arena) {
        match DebrisCloud::from_profile(&CloudProfile::DECOY, self.location()) {
            Ok(cloud) => {
                arena.admit(cloud);
            }
            Err(err) => warn!(id = %self.id(), error = %err, "decoy launch failed"),
        }
    }

    fn seek_repairs(&mut self, arena: &mut Arena) {
        let Some(station) = arena
            .nearest_station(self.location(), self.side())
            .and_then(|id| arena.location_of(&id))
        else {
            return;
        };

        if self.is_docked() {
            self.combat.repair(REPAIR_PER_TICK);
            self.motion.set_location(station);
        } else if self.location().distance(station) <= DOCKING_RANGE {
            self.combat.status_flags.insert(StatusFlags::DOCKED);
            self.motion.set_location(station);
            self.motion.set_destination_to(station);
            debug!(id = %self.id(), "docked for repairs");
        } else {
            self.motion.set_destination_to(station);
        }
    }
}

impl SpaceEntity for CargoShip {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::CargoShip
    }

    fn location(&self) -> Point3D {
        self.motion.location()
    }

    fn destination(&self) -> Point3D {
        self.motion.destination()
    }

    fn heading(&self) -> f64 {
        self.motion.heading()
    }

    fn speed(&self) -> f64 {
        self.motion.speed()
    }

    fn move_by(&mut self, dt: f64, _arena: &mut Arena) -> Result<(), SimError> {
        self.motion.move_by(dt)?;
        Ok(())
    }

    fn update(&mut self, arena: &mut Arena) {
        if self.combat.needs_repair() {
            self.seek_repairs(arena);
        } else if self.is_docked() {
            self.motion.reroute(arena);
            self.combat.status_flags.remove(StatusFlags::DOCKED);
            debug!(id = %self.id(), "repaired, undocking");
        }
    }

    fn at_destination(&self) -> bool {
        self.motion.at_destination()
    }

    fn reroute(&mut self, arena: &mut Arena) {
        self.motion.reroute(arena);
    }

    fn is_destroyed(&self) -> bool {
        self.combat.is_destroyed()
    }

    fn is_damaged(&self) -> bool {
        self.combat.is_damaged()
    }

    fn apply_damage(&mut self, amount: f64, arena: &mut Arena) {
        if self.combat.take_damage(amount) == DamageOutcome::Destroyed {
            info!(id = %self.id(), "cargo ship destroyed");
            self.drop_decoy(arena);
        }
    }

    fn react_to_radar_lock(&mut self, _attacker: Point3D, arena: &mut Arena) {
        if self.decoys > 0 {
            self.drop_decoy(arena);
            self.decoys -= 1;
        }
    }

    fn is_targetable(&self) -> bool {
        true
    }

    fn shape(&self) -> &Polygon {
        &self.shape
    }

    fn status_text(&self) -> String {
        format!(
            "{}\nDebris Clouds: {}",
            status_header(self, &self.combat),
            self.decoys
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SpacePort;
    use crate::geometry::WorldBounds;

    fn arena() -> Arena {
        Arena::with_seed(WorldBounds::default(), 21)
    }

    fn ship(arena: &mut Arena, decoys: u32) -> CargoShip {
        CargoShip::new(Side::Cyan, 5.0, 1000.0, decoys, arena).unwrap()
    }

    fn clouds(arena: &Arena) -> Vec<&DebrisCloud> {
        arena.entities().filter_map(|e| e.as_debris_cloud()).collect()
    }

    #[test]
    fn rejects_negative_inputs() {
        let mut arena = arena();
        assert!(CargoShip::new(Side::Cyan, -1.0, 1000.0, 0, &mut arena).is_err());
        assert!(CargoShip::new(Side::Cyan, 1.0, -1000.0, 0, &mut arena).is_err());
    }

    #[test]
    fn radar_lock_drops_decoy_until_empty() {
        let mut arena = arena();
        let mut ship = ship(&mut arena, 2).placed(Point3D::splat(100.0), Point3D::splat(200.0));

        for _ in 0..3 {
            ship.react_to_radar_lock(Point3D::ZERO, &mut arena);
        }

        assert_eq!(ship.decoys(), 0);
        let clouds = clouds(&arena);
        assert_eq!(clouds.len(), 2);
        assert!(clouds.iter().all(|c| c.location() == Point3D::splat(100.0)));
        assert!(clouds.iter().all(|c| c.side() == Side::Gray && c.is_targetable()));
    }

    #[test]
    fn lethal_damage_leaves_one_decoy() {
        let mut arena = arena();
        let mut ship = ship(&mut arena, 0);

        ship.apply_damage(1500.0, &mut arena);
        ship.apply_damage(1500.0, &mut arena);

        assert!(ship.is_destroyed());
        assert_eq!(clouds(&arena).len(), 1);
    }

    #[test]
    fn damaged_ship_docks_repairs_and_undocks() {
        let mut arena = arena();
        let station = Point3D::new(300.0, 300.0, 300.0);
        let port = SpacePort::new(Side::Cyan, 0.0, 2500.0, 0, &mut arena)
            .unwrap()
            .placed(station, station);
        arena.admit(port);

        let mut ship = ship(&mut arena, 0).placed(Point3D::new(305.0, 300.0, 300.0), Point3D::ZERO);
        ship.apply_damage(2.0, &mut arena);

        ship.update(&mut arena);
        assert!(ship.is_docked());
        assert_eq!(ship.location(), station);

        ship.update(&mut arena);
        assert!((ship.combat().strength - 999.0).abs() < 1e-9);
        ship.update(&mut arena);
        assert!(!ship.combat().needs_repair());
        assert!(ship.is_docked());

        ship.update(&mut arena);
        assert!(!ship.is_docked());
        assert!(ship.is_damaged());
    }

    #[test]
    fn distant_station_pulls_ship_in() {
        let mut arena = arena();
        let station = Point3D::new(500.0, 500.0, 500.0);
        let port = SpacePort::new(Side::Cyan, 0.0, 2500.0, 0, &mut arena)
            .unwrap()
            .placed(station, station);
        arena.admit(port);

        let mut ship = ship(&mut arena, 0).placed(Point3D::ZERO, Point3D::ONE);
        ship.apply_damage(10.0, &mut arena);
        ship.update(&mut arena);

        assert_eq!(ship.location(), station);
        assert!(!ship.is_docked());
    }

    #[test]
    fn ignores_enemy_stations() {
        let mut arena = arena();
        let port = SpacePort::new(Side::Magenta, 0.0, 2500.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::ONE, Point3D::ONE);
        arena.admit(port);

        let mut ship = ship(&mut arena, 0).placed(Point3D::splat(2.0), Point3D::splat(50.0));
        ship.apply_damage(10.0, &mut arena);
        ship.update(&mut arena);

        assert!(!ship.is_docked());
        assert_eq!(ship.location(), Point3D::splat(2.0));
    }
}
