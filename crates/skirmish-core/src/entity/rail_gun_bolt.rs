//! Unguided rail gun round fired by space ports.
//!
//! A bolt flies to a fixed point and detonates there. It cannot be targeted
//! or damaged, and it is destroyed exactly when it arrives.

use tracing::warn;

use super::debris_cloud::{CloudProfile, DebrisCloud};
use super::{status_header, CombatState, EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::{non_negative, SimError};
use crate::geometry::{Point3D, Polygon};
use crate::identity::{Identity, Side};
use crate::motion::{Guided, Movable, MoveOutcome};

const HULL: [(f64, f64); 4] = [(2.0, -6.0), (2.0, 3.0), (-2.0, 3.0), (-2.0, -6.0)];

/// Flight and warhead parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltProfile {
    /// Distance per unit time.
    pub speed: f64,
    /// Nominal strength, for readouts.
    pub strength: f64,
    /// Blast radius.
    pub detonation_radius: f64,
    /// Upper bound of damage dealt to each entity in the blast.
    pub damage: f64,
}

impl BoltProfile {
    /// Rounds fired by space ports.
    pub const RAIL_GUN: Self = Self {
        speed: 30.0,
        strength: 1.0,
        detonation_radius: 10.0,
        damage: 200.0,
    };
}

/// Rail gun bolt state.
#[derive(Debug)]
pub struct RailGunBolt {
    identity: Identity,
    motion: Guided,
    combat: CombatState,
    detonation_radius: f64,
    damage: f64,
    shape: Polygon,
}

impl RailGunBolt {
    /// Fires from `start` toward `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] if any profile field is negative.
    pub fn new(side: Side, start: Point3D, end: Point3D, profile: &BoltProfile) -> Result<Self, SimError> {
        let motion = Guided::new(profile.speed, 0.0, start, end)?;
        let combat = CombatState::new(profile.strength)?;
        let detonation_radius = non_negative("detonation_radius", profile.detonation_radius)?;
        let damage = non_negative("damage", profile.damage)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::RailGunBolt),
            motion,
            combat,
            detonation_radius,
            damage,
            shape: Polygon::from_points(&HULL),
        })
    }
}

impl SpaceEntity for RailGunBolt {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::RailGunBolt
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

    fn move_by(&mut self, dt: f64, arena: &mut Arena) -> Result<(), SimError> {
        if self.motion.move_by(dt)? == MoveOutcome::Arrived {
            let at = self.location();
            match DebrisCloud::from_profile(&CloudProfile::SPLASH, at) {
                Ok(cloud) => {
                    arena.admit(cloud);
                }
                Err(err) => warn!(id = %self.id(), error = %err, "splash cloud failed"),
            }
            arena.area_damage_at(at, self.detonation_radius, self.damage);
        }
        Ok(())
    }

    fn update(&mut self, _arena: &mut Arena) {}

    fn at_destination(&self) -> bool {
        self.motion.at_destination()
    }

    fn is_destroyed(&self) -> bool {
        self.motion.has_arrived()
    }

    fn is_damaged(&self) -> bool {
        false
    }

    fn apply_damage(&mut self, _amount: f64, _arena: &mut Arena) {}

    fn is_targetable(&self) -> bool {
        false
    }

    fn shape(&self) -> &Polygon {
        &self.shape
    }

    fn status_text(&self) -> String {
        format!(
            "{}\nDetonation Range: {:.2}\nDamage: {:.2}",
            status_header(self, &self.combat),
            self.detonation_radius,
            self.damage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CargoShip;
    use crate::geometry::WorldBounds;

    #[test]
    fn destroyed_exactly_on_arrival() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 51);
        let mut bolt = RailGunBolt::new(
            Side::Red,
            Point3D::ZERO,
            Point3D::new(45.0, 0.0, 0.0),
            &BoltProfile::RAIL_GUN,
        )
        .unwrap();

        bolt.move_by(1.0, &mut arena).unwrap();
        assert!(!bolt.is_destroyed());
        bolt.move_by(1.0, &mut arena).unwrap();
        assert!(bolt.is_destroyed());
        assert_eq!(bolt.location(), Point3D::new(45.0, 0.0, 0.0));
    }

    #[test]
    fn bolt_fired_at_its_own_location_stays_live() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 54);
        let here = Point3D::splat(40.0);
        let mut bolt = RailGunBolt::new(Side::Red, here, here, &BoltProfile::RAIL_GUN).unwrap();

        for _ in 0..5 {
            bolt.move_by(1.0, &mut arena).unwrap();
        }

        assert!(!bolt.is_destroyed());
        assert_eq!(bolt.location(), here);
        assert!(arena.is_empty());
    }

    #[test]
    fn arrival_damages_nearby_only() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 52);
        let near = CargoShip::new(Side::Blue, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::new(25.0, 0.0, 0.0), Point3D::ZERO);
        let far = CargoShip::new(Side::Blue, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::new(60.0, 0.0, 0.0), Point3D::ZERO);
        let far_id = arena.admit(far);
        let near_id = arena.admit(near);

        let mut bolt = RailGunBolt::new(
            Side::Red,
            Point3D::ZERO,
            Point3D::new(20.0, 0.0, 0.0),
            &BoltProfile::RAIL_GUN,
        )
        .unwrap();
        bolt.move_by(1.0, &mut arena).unwrap();

        let strength = |id| {
            arena
                .get(id)
                .and_then(|e| e.as_cargo_ship())
                .map(|s| s.combat().strength)
                .unwrap()
        };
        assert!(strength(&near_id) > 800.0);
        assert!((strength(&far_id) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ignores_damage_and_radar() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 53);
        let mut bolt =
            RailGunBolt::new(Side::Red, Point3D::ZERO, Point3D::ONE, &BoltProfile::RAIL_GUN).unwrap();
        bolt.apply_damage(1e9, &mut arena);
        assert!(!bolt.is_destroyed());
        assert!(!bolt.is_damaged());
        assert!(!bolt.is_targetable());
    }
}
