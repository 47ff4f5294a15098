//! Missile-armed fighter.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::components::{CombatState, DamageOutcome};
use super::debris_cloud::{CloudProfile, DebrisCloud};
use super::guided_missile::{GuidedMissile, MissileProfile};
use super::{status_header, EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::SimError;
use crate::geometry::{Point3D, Polygon};
use crate::identity::{EntityId, Identity, Side};
use crate::motion::{FreeRoam, Movable, PointSampler};

/// Ticks before the same target can be engaged again.
pub const MISSILE_COOLDOWN: u32 = 250;

const HULL: [(f64, f64); 12] = [
    (0.0, -16.0),
    (4.0, -8.0),
    (10.0, -12.0),
    (16.0, 8.0),
    (8.0, 0.0),
    (6.0, 2.0),
    (0.0, 20.0),
    (-6.0, 2.0),
    (-8.0, 0.0),
    (-16.0, 8.0),
    (-10.0, -12.0),
    (-4.0, -8.0),
];

/// Fighter ship state.
///
/// Every tick the fighter sweeps for targets and fires one missile at each
/// target not on cooldown, while missiles last.
#[derive(Debug)]
pub struct FighterShip {
    identity: Identity,
    motion: FreeRoam,
    combat: CombatState,
    missiles: u32,
    cooldowns: BTreeMap<EntityId, u32>,
    shape: Polygon,
}

impl FighterShip {
    /// Creates a fighter at a random location.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative speed or strength.
    pub fn new<S: PointSampler + ?Sized>(
        side: Side,
        speed: f64,
        max_strength: f64,
        missiles: u32,
        sampler: &mut S,
    ) -> Result<Self, SimError> {
        let motion = FreeRoam::new(speed, 0.0, sampler)?;
        let combat = CombatState::new(max_strength)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::FighterShip),
            motion,
            combat,
            missiles,
            cooldowns: BTreeMap::new(),
            shape: Polygon::from_points(&HULL),
        })
    }

    /// Moves the fighter to `location`, heading for `destination`.
    #[must_use]
    pub fn placed(mut self, location: Point3D, destination: Point3D) -> Self {
        self.motion.place(location, destination);
        self
    }

    /// Missiles left.
    #[must_use]
    pub fn missiles(&self) -> u32 {
        self.missiles
    }

    /// Strength bookkeeping.
    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    /// Ticks remaining before `target` may be engaged, if on cooldown.
    #[must_use]
    pub fn cooldown(&self, target: &EntityId) -> Option<u32> {
        self.cooldowns.get(target).copied()
    }

    fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, left| {
            *left = left.saturating_sub(1);
            *left > 0
        });
    }

    fn engage(&mut self, arena: &mut Arena) {
        let origin = self.location();
        for target in arena.radar_sweep(origin, self.side()) {
            if self.missiles == 0 {
                break;
            }
            if self.cooldowns.contains_key(&target) {
                continue;
            }
            arena.radar_lock(&target, origin);
            self.fire_at(target, arena);
        }
    }

    /// Spends one missile on `target` and starts its cooldown, whether or
    /// not the launch succeeds.
    fn fire_at(&mut self, target: EntityId, arena: &mut Arena) {
        self.missiles = self.missiles.saturating_sub(1);
        self.cooldowns.insert(target.clone(), MISSILE_COOLDOWN);

        let Some(aim) = arena.location_of(&target) else {
            warn!(id = %self.id(), target = %target, "missile launch failed: target lost");
            return;
        };
        match GuidedMissile::new(
            self.side(),
            self.location(),
            aim,
            target.clone(),
            self.heading(),
            &MissileProfile::FIGHTER,
        ) {
            Ok(missile) => {
                debug!(id = %self.id(), target = %target, "missile away");
                arena.admit(missile);
            }
            Err(err) => warn!(id = %self.id(), error = %err, "missile launch failed"),
        }
    }
}

impl SpaceEntity for FighterShip {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::FighterShip
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
        self.tick_cooldowns();
        if self.missiles > 0 {
            self.engage(arena);
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
            info!(id = %self.id(), "fighter ship destroyed");
            match DebrisCloud::from_profile(&CloudProfile::DECOY, self.location()) {
                Ok(cloud) => {
                    arena.admit(cloud);
                }
                Err(err) => warn!(id = %self.id(), error = %err, "wreck cloud failed"),
            }
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
            "{}\nMissiles: {}",
            status_header(self, &self.combat),
            self.missiles
        )
    }
}
