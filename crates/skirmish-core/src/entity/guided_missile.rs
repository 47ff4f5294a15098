//! Homing missile.
//!
//! A missile re-aims at its target's current location before every step and
//! tries to keep (or move) its lock after every step. It detonates when it
//! arrives, runs out of lifetime or strength, loses track of its target, or is
//! destroyed by damage. Detonation spawns a splash cloud and damages
//! everything within the blast radius.

use tracing::{debug, warn};

use super::components::{CombatState, DamageOutcome};
use super::debris_cloud::{CloudProfile, DebrisCloud};
use super::{status_header, EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::{non_negative, SimError};
use crate::geometry::{Point3D, Polygon};
use crate::identity::{EntityId, Identity, Side};
use crate::motion::{check_interval, Guided, Movable, MoveOutcome};

const HULL: [(f64, f64); 12] = [
    (0.0, -10.0),
    (2.0, -6.0),
    (2.0, 3.0),
    (4.0, 9.0),
    (2.0, 9.0),
    (2.0, 7.0),
    (0.0, 8.0),
    (-2.0, 7.0),
    (-2.0, 9.0),
    (-4.0, 9.0),
    (-2.0, 3.0),
    (-2.0, -6.0),
];

/// Flight and warhead parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileProfile {
    /// Distance per unit time.
    pub speed: f64,
    /// Starting strength.
    pub strength: f64,
    /// Blast radius.
    pub detonation_radius: f64,
    /// Upper bound of damage dealt to each entity in the blast.
    pub damage: f64,
    /// Ticks of flight before self-destruct.
    pub lifetime: u32,
}

impl MissileProfile {
    /// Missiles carried by fighter ships.
    pub const FIGHTER: Self = Self {
        speed: 5.5,
        strength: 1.0,
        detonation_radius: 25.0,
        damage: 1200.0,
        lifetime: 250,
    };
}

/// Guided missile state.
#[derive(Debug)]
pub struct GuidedMissile {
    identity: Identity,
    motion: Guided,
    combat: CombatState,
    target: Option<EntityId>,
    detonation_radius: f64,
    damage: f64,
    lifetime: u32,
    shape: Polygon,
}

impl GuidedMissile {
    /// Launches from `start` toward `aim`, locked on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] if any real-valued profile field
    /// is negative.
    pub fn new(
        side: Side,
        start: Point3D,
        aim: Point3D,
        target: EntityId,
        heading: f64,
        profile: &MissileProfile,
    ) -> Result<Self, SimError> {
        let motion = Guided::new(profile.speed, heading, start, aim)?;
        let combat = CombatState::new(profile.strength)?;
        let detonation_radius = non_negative("detonation_radius", profile.detonation_radius)?;
        let damage = non_negative("damage", profile.damage)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::GuidedMissile),
            motion,
            combat,
            target: Some(target),
            detonation_radius,
            damage,
            lifetime: profile.lifetime,
            shape: Polygon::from_points(&HULL),
        })
    }

    /// Current lock, if any.
    #[must_use]
    pub fn target(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Ticks of flight left.
    #[must_use]
    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Blast radius.
    #[must_use]
    pub fn detonation_radius(&self) -> f64 {
        self.detonation_radius
    }

    /// Marks the missile destroyed and explodes, once.
    fn detonate(&mut self, arena: &mut Arena) {
        if self.combat.destroy() {
            self.explode(arena);
        }
    }

    fn explode(&self, arena: &mut Arena) {
        let at = self.location();
        debug!(id = %self.id(), "missile detonated");
        match DebrisCloud::from_profile(&CloudProfile::SPLASH, at) {
            Ok(cloud) => {
                arena.admit(cloud);
            }
            Err(err) => warn!(id = %self.id(), error = %err, "splash cloud failed"),
        }
        arena.area_damage_at(at, self.detonation_radius, self.damage);
    }
}

impl SpaceEntity for GuidedMissile {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::GuidedMissile
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
        let dt = check_interval(dt)?;
        if self.is_destroyed() {
            return Ok(());
        }
        if self.motion.has_arrived() {
            self.combat.destroy();
            return Ok(());
        }
        if self.lifetime == 0 || self.combat.strength <= 0.0 {
            self.detonate(arena);
            return Ok(());
        }
        self.lifetime -= 1;

        let Some(aim) = self.target.as_ref().and_then(|t| arena.location_of(t)) else {
            self.detonate(arena);
            return Ok(());
        };
        self.motion.set_destination_to(aim);

        if self.motion.move_by(dt)? == MoveOutcome::Arrived {
            self.detonate(arena);
        }
        Ok(())
    }

    fn update(&mut self, arena: &mut Arena) {
        if self.is_destroyed() {
            return;
        }
        let origin = self.location();
        let side = self.side();
        self.target = self
            .target
            .take()
            .and_then(|current| arena.reacquire_lock(origin, &current, side));
        if self.target.is_none() {
            self.detonate(arena);
        }
    }

    fn at_destination(&self) -> bool {
        self.motion.at_destination()
    }

    fn is_destroyed(&self) -> bool {
        self.combat.is_destroyed()
    }

    fn is_damaged(&self) -> bool {
        self.combat.is_damaged()
    }

    fn apply_damage(&mut self, amount: f64, arena: &mut Arena) {
        if self.combat.take_damage(amount) == DamageOutcome::Destroyed {
            self.explode(arena);
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
            "{}\nDetonation Range: {:.2}\nDamage: {:.2}\nDuration: {}",
            status_header(self, &self.combat),
            self.detonation_radius,
            self.damage,
            self.lifetime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CargoShip;
    use crate::geometry::WorldBounds;

    fn splashes(arena: &Arena) -> usize {
        arena
            .entities()
            .filter_map(|e| e.as_debris_cloud())
            .filter(|c| c.side() == Side::Yellow)
            .count()
    }

    fn missile(start: Point3D, aim: Point3D, target: EntityId, profile: &MissileProfile) -> GuidedMissile {
        GuidedMissile::new(Side::Cyan, start, aim, target, 0.0, profile).unwrap()
    }

    #[test]
    fn rejects_negative_profile() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 41);
        let target = CargoShip::new(Side::Magenta, 0.0, 1.0, 0, &mut arena).unwrap();
        let bad = MissileProfile {
            damage: -1.0,
            ..MissileProfile::FIGHTER
        };
        assert!(GuidedMissile::new(
            Side::Cyan,
            Point3D::ZERO,
            Point3D::ONE,
            target.id().clone(),
            0.0,
            &bad
        )
        .is_err());
    }

    #[test]
    fn homes_on_moving_target() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 42);
        let target = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::new(100.0, 0.0, 0.0), Point3D::ZERO);
        let target_id = arena.admit(target);

        let mut m = missile(Point3D::ZERO, Point3D::new(50.0, 0.0, 0.0), target_id, &MissileProfile::FIGHTER);
        m.move_by(1.0, &mut arena).unwrap();

        assert_eq!(m.destination(), Point3D::new(100.0, 0.0, 0.0));
        assert!(m.location().distance(Point3D::new(5.5, 0.0, 0.0)) < 1e-9);
        assert_eq!(m.lifetime(), 249);
        assert!(!m.is_destroyed());
    }

    #[test]
    fn arrival_detonates_and_damages_target() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 43);
        let target = CargoShip::new(Side::Magenta, 0.0, 1_000_000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::new(3.0, 0.0, 0.0), Point3D::ZERO);
        let target_id = arena.admit(target);

        let mut m = missile(Point3D::ZERO, Point3D::ONE, target_id.clone(), &MissileProfile::FIGHTER);
        m.move_by(1.0, &mut arena).unwrap();

        assert!(m.is_destroyed());
        assert!(m.at_destination());
        assert_eq!(splashes(&arena), 1);
        let hit = arena.get(&target_id).and_then(|e| e.as_cargo_ship()).unwrap();
        assert!(hit.combat().strength <= 1_000_000.0);
        assert!(hit.combat().strength > 1_000_000.0 - 1200.0);
    }

    #[test]
    fn expired_lifetime_detonates() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 44);
        let target = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::splat(500.0), Point3D::ZERO);
        let target_id = arena.admit(target);
        let profile = MissileProfile {
            lifetime: 2,
            ..MissileProfile::FIGHTER
        };

        let mut m = missile(Point3D::ZERO, Point3D::splat(500.0), target_id, &profile);
        m.move_by(1.0, &mut arena).unwrap();
        m.move_by(1.0, &mut arena).unwrap();
        assert!(!m.is_destroyed());
        m.move_by(1.0, &mut arena).unwrap();
        assert!(m.is_destroyed());
        assert_eq!(splashes(&arena), 1);

        m.move_by(1.0, &mut arena).unwrap();
        assert_eq!(splashes(&arena), 1);
    }

    #[test]
    fn lost_target_leaves_no_strength() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 47);
        let ghost = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena).unwrap();
        let mut m = missile(Point3D::ZERO, Point3D::ONE, ghost.id().clone(), &MissileProfile::FIGHTER);

        m.move_by(1.0, &mut arena).unwrap();

        assert!(m.is_destroyed());
        assert!(m.combat.strength <= 0.0);
        assert!(m.snapshot().destroyed);
    }

    #[test]
    fn expired_lifetime_leaves_no_strength() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 48);
        let target = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena)
            .unwrap()
            .placed(Point3D::splat(500.0), Point3D::ZERO);
        let target_id = arena.admit(target);
        let profile = MissileProfile {
            lifetime: 0,
            ..MissileProfile::FIGHTER
        };
        let mut m = missile(Point3D::ZERO, Point3D::splat(500.0), target_id, &profile);

        m.move_by(1.0, &mut arena).unwrap();

        assert!(m.is_destroyed());
        assert!(m.combat.strength <= 0.0);
    }

    #[test]
    fn negative_interval_is_rejected() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 45);
        let target = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena).unwrap();
        let mut m = missile(Point3D::ZERO, Point3D::ONE, target.id().clone(), &MissileProfile::FIGHTER);
        assert_eq!(m.move_by(-2.0, &mut arena), Err(SimError::InvalidInterval(-2.0)));
        assert_eq!(m.lifetime(), 250);
    }

    #[test]
    fn lethal_damage_explodes_once() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 46);
        let target = CargoShip::new(Side::Magenta, 0.0, 1000.0, 0, &mut arena).unwrap();
        let mut m = missile(Point3D::ZERO, Point3D::ONE, target.id().clone(), &MissileProfile::FIGHTER);

        m.apply_damage(5.0, &mut arena);
        m.apply_damage(5.0, &mut arena);
        m.update(&mut arena);

        assert!(m.is_destroyed());
        assert_eq!(splashes(&arena), 1);
    }
}
