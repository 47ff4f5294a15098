//! Slow-moving station armed with rail guns.
//!
//! A port answers every radar lock with a salvo of bolts aimed roughly at the
//! attacker. Friendly cargo ships dock at ports for repairs; a destroyed port
//! leaves a wreck cloud and batters whatever was docked.

use rand::Rng;
use tracing::{info, warn};

use super::components::{CombatState, DamageOutcome};
use super::debris_cloud::{CloudProfile, DebrisCloud};
use super::rail_gun_bolt::{BoltProfile, RailGunBolt};
use super::{status_header, EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::SimError;
use crate::geometry::{Point3D, Polygon};
use crate::identity::{EntityId, Identity, Side};
use crate::motion::{FreeRoam, Movable, PointSampler};

/// Bolts fired per radar lock, at most.
pub const SALVO_SIZE: u32 = 10;

/// Per-axis aim spread as a fraction of the attacker's coordinate.
pub const AIM_JITTER: f64 = 0.05;

/// Upper bound of damage dealt to each docked ship when the port dies.
pub const DOCKED_SHIP_DAMAGE: f64 = 1500.0;

const HULL: [(f64, f64); 8] = [
    (0.0, -20.0),
    (6.0, -6.0),
    (20.0, 0.0),
    (6.0, 6.0),
    (0.0, 20.0),
    (-6.0, 6.0),
    (-20.0, 0.0),
    (-6.0, -6.0),
];

/// Space port state.
#[derive(Debug)]
pub struct SpacePort {
    identity: Identity,
    motion: FreeRoam,
    combat: CombatState,
    bolts: u32,
    docked: Vec<EntityId>,
    shape: Polygon,
}

impl SpacePort {
    /// Creates a port at a random location.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative speed or strength.
    pub fn new<S: PointSampler + ?Sized>(
        side: Side,
        speed: f64,
        max_strength: f64,
        bolts: u32,
        sampler: &mut S,
    ) -> Result<Self, SimError> {
        let motion = FreeRoam::new(speed, 0.0, sampler)?;
        let combat = CombatState::new(max_strength)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::SpacePort),
            motion,
            combat,
            bolts,
            docked: Vec::new(),
            shape: Polygon::from_points(&HULL),
        })
    }

    /// Moves the port to `location`, heading for `destination`.
    #[must_use]
    pub fn placed(mut self, location: Point3D, destination: Point3D) -> Self {
        self.motion.place(location, destination);
        self
    }

    /// Bolts left.
    #[must_use]
    pub fn bolts(&self) -> u32 {
        self.bolts
    }

    /// Ships found docked at the last update.
    #[must_use]
    pub fn docked(&self) -> &[EntityId] {
        &self.docked
    }

    /// Strength bookkeeping.
    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }
}

fn jitter<R: Rng + ?Sized>(p: Point3D, rng: &mut R) -> Point3D {
    let mut spread = || 1.0 - AIM_JITTER + rng.gen::<f64>() * 2.0 * AIM_JITTER;
    Point3D::new(p.x * spread(), p.y * spread(), p.z * spread())
}

impl SpaceEntity for SpacePort {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::SpacePort
    }

    fn location(&self) -> Point3D {
        self.motion.location()
    }

    fn destination(&self) -> Point3D {
        self.motion.destination()
    }

    /// Stations are drawn unrotated.
    fn heading(&self) -> f64 {
        0.0
    }

    fn speed(&self) -> f64 {
        self.motion.speed()
    }

    fn move_by(&mut self, dt: f64, _arena: &mut Arena) -> Result<(), SimError> {
        self.motion.move_by(dt)?;
        Ok(())
    }

    fn update(&mut self, arena: &mut Arena) {
        self.docked = arena.find_docked_ships(self.location(), self.side());
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
        if self.combat.take_damage(amount) != DamageOutcome::Destroyed {
            return;
        }
        info!(id = %self.id(), docked = self.docked.len(), "space port destroyed");
        match DebrisCloud::from_profile(&CloudProfile::WRECK, self.location()) {
            Ok(cloud) => {
                arena.admit(cloud);
            }
            Err(err) => warn!(id = %self.id(), error = %err, "wreck cloud failed"),
        }
        for ship in &self.docked {
            let amount = arena.rng().gen::<f64>() * DOCKED_SHIP_DAMAGE;
            arena.apply_damage_to(ship, amount);
        }
    }

    fn react_to_radar_lock(&mut self, attacker: Point3D, arena: &mut Arena) {
        let salvo = SALVO_SIZE.min(self.bolts);
        let origin = self.location();
        for _ in 0..salvo {
            let aim = jitter(attacker, arena.rng());
            match RailGunBolt::new(self.side(), origin, aim, &BoltProfile::RAIL_GUN) {
                Ok(bolt) => {
                    arena.admit(bolt);
                }
                Err(err) => warn!(id = %self.id(), error = %err, "bolt launch failed"),
            }
            self.bolts -= 1;
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
            "{}\nBolts: {}\nDocked Ships: {}",
            status_header(self, &self.combat),
            self.bolts,
            self.docked.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CargoShip;
    use crate::geometry::WorldBounds;

    fn port(arena: &mut Arena, bolts: u32) -> SpacePort {
        let at = Point3D::splat(300.0);
        SpacePort::new(Side::Cyan, 0.025, 2500.0, bolts, arena)
            .unwrap()
            .placed(at, at)
    }

    fn bolts_in(arena: &Arena) -> Vec<&RailGunBolt> {
        arena.entities().filter_map(|e| e.as_rail_gun_bolt()).collect()
    }

    #[test]
    fn salvo_is_capped_by_remaining_bolts() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 71);
        let mut port = port(&mut arena, 14);

        port.react_to_radar_lock(Point3D::splat(200.0), &mut arena);
        assert_eq!(port.bolts(), 4);
        port.react_to_radar_lock(Point3D::splat(200.0), &mut arena);
        assert_eq!(port.bolts(), 0);
        port.react_to_radar_lock(Point3D::splat(200.0), &mut arena);

        assert_eq!(bolts_in(&arena).len(), 14);
    }

    #[test]
    fn bolts_aim_near_attacker() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 72);
        let mut port = port(&mut arena, 10);
        let attacker = Point3D::new(100.0, 200.0, 400.0);
        port.react_to_radar_lock(attacker, &mut arena);

        for bolt in bolts_in(&arena) {
            let aim = bolt.destination();
            assert_eq!(bolt.location(), Point3D::splat(300.0));
            assert!((95.0..=105.0).contains(&aim.x));
            assert!((190.0..=210.0).contains(&aim.y));
            assert!((380.0..=420.0).contains(&aim.z));
        }
    }

    #[test]
    fn tracks_docked_friendly_cargo_ships() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 73);
        let mut port = port(&mut arena, 0);
        let here = Point3D::new(303.0, 300.0, 300.0);
        let friend = CargoShip::new(Side::Cyan, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(here, here);
        let enemy = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(here, here);
        let friend_id = arena.admit(friend);
        arena.admit(enemy);

        port.update(&mut arena);
        assert_eq!(port.docked(), &[friend_id]);
    }

    #[test]
    fn destruction_leaves_wreck_and_hits_docked_ships() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 74);
        let mut port = port(&mut arena, 0);
        let friend = CargoShip::new(Side::Cyan, 0.0, 100_000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::splat(300.0), Point3D::splat(300.0));
        let friend_id = arena.admit(friend);

        port.update(&mut arena);
        port.apply_damage(5000.0, &mut arena);

        assert!(port.is_destroyed());
        assert_eq!(port.heading(), 0.0);
        let wreck = arena.entities().find_map(|e| e.as_debris_cloud()).unwrap();
        assert_eq!(wreck.side(), Side::Yellow);
        assert!(wreck.is_targetable());
        let ship = arena.get(&friend_id).and_then(|e| e.as_cargo_ship()).unwrap();
        assert!(ship.combat().strength > 100_000.0 - DOCKED_SHIP_DAMAGE);
    }
}
