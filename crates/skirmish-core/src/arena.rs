//! Arena module for the skirmish simulation.
//!
//! The Arena is the container for all entities in a battle. It provides:
//! - Entity storage in admission order
//! - Cross-entity queries (radar sweeps, lock reacquisition, docking, area damage)
//! - Entity lifecycle management (admit/retire)
//! - Per-side population bookkeeping
//! - The per-tick sweep that moves and updates every entity
//!
//! # Checkout
//!
//! Entities act on each other through the arena. While one entity is being
//! processed it is taken out of its slot, handed `&mut Arena`, and put back
//! afterwards. Queries made during that call see every other entity, including
//! ones admitted moments earlier, but never the acting entity itself.
//!
//! # Sweep Semantics
//!
//! A sweep visits the slots that existed when it started. Entities admitted
//! mid-sweep are queryable immediately and first processed on the next sweep.
//! Retiring an entity empties its slot, so no other entity is skipped or
//! visited twice; empty slots are compacted after the sweep.
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use skirmish_core::entity::{CargoShip, FighterShip};
//! use skirmish_core::geometry::{Point3D, WorldBounds};
//! use skirmish_core::identity::Side;
//!
//! let mut arena = Arena::with_seed(WorldBounds::default(), 1);
//!
//! let fighter = FighterShip::new(Side::Cyan, 5.0, 1000.0, 10, &mut arena)
//!     .unwrap()
//!     .placed(Point3D::splat(100.0), Point3D::splat(400.0));
//! arena.admit(fighter);
//!
//! let freighter = CargoShip::new(Side::Magenta, 5.0, 1000.0, 0, &mut arena)
//!     .unwrap()
//!     .placed(Point3D::splat(150.0), Point3D::splat(400.0));
//! let freighter_id = arena.admit(freighter);
//!
//! // Enemies in range always show up on radar.
//! let contacts = arena.radar_sweep(Point3D::splat(100.0), Side::Cyan);
//! assert_eq!(contacts, vec![freighter_id]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace_span, warn};

use crate::config::{SideLoadout, SimConfig};
use crate::entity::{CargoShip, Entity, EntityKind, FighterShip, SpaceEntity, SpacePort};
use crate::error::SimError;
use crate::geometry::{Point3D, WorldBounds};
use crate::identity::{EntityId, Side};
use crate::motion::PointSampler;
use crate::render::{PopulationSummary, RenderSink};

/// Radar reach for sweeps and lock reacquisition.
pub const RADAR_RANGE: f64 = 150.0;

/// A friendly contact is reported only when a uniform draw exceeds this.
pub const FRIENDLY_CONTACT_THRESHOLD: f64 = 0.99;

/// An existing lock is kept when a uniform draw is at or below this.
pub const LOCK_RETENTION: f64 = 0.99;

/// Distance within which a cargo ship counts as docked at a port.
pub const DOCKED_RANGE: f64 = 5.0;

// =============================================================================
// Arena
// =============================================================================

/// Battle container holding every live entity.
#[derive(Debug)]
pub struct Arena {
    /// Entity slots in admission order. `None` marks a retired or checked-out entity.
    slots: Vec<Option<Entity>>,
    /// World volume for random placement.
    bounds: WorldBounds,
    /// Source of every probabilistic decision.
    rng: ChaCha8Rng,
    /// Live ship and port counts.
    population: PopulationSummary,
    /// Completed sweeps.
    tick: u64,
}

impl Arena {
    /// Creates an empty arena seeded from OS entropy.
    #[must_use]
    pub fn new(bounds: WorldBounds) -> Self {
        Self::with_rng(bounds, ChaCha8Rng::from_entropy())
    }

    /// Creates an empty arena with a reproducible random stream.
    #[must_use]
    pub fn with_seed(bounds: WorldBounds, seed: u64) -> Self {
        Self::with_rng(bounds, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates an empty arena from configuration bounds and seed.
    #[must_use]
    pub fn from_config(config: &SimConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.bounds, seed),
            None => Self::new(config.bounds),
        }
    }

    fn with_rng(bounds: WorldBounds, rng: ChaCha8Rng) -> Self {
        Self {
            slots: Vec::new(),
            bounds,
            rng,
            population: PopulationSummary::new(),
            tick: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Adds an entity and returns its id.
    ///
    /// Safe to call from inside another entity's update: the newcomer is
    /// visible to queries at once and processed from the next sweep.
    pub fn admit(&mut self, entity: impl Into<Entity>) -> EntityId {
        let entity = entity.into();
        let id = entity.id().clone();
        debug_assert!(!self.contains(&id), "duplicate entity id {id}");

        if let Some(category) = entity.kind().category() {
            self.population.increment(entity.side(), category);
        }
        debug!(id = %id, kind = %entity.kind(), "entity admitted");
        self.slots.push(Some(entity));
        id
    }

    /// Removes an entity, returning it if it was present.
    pub fn retire(&mut self, id: &EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.slots.get_mut(index).and_then(Option::take)?;
        self.forget(&entity);
        Some(entity)
    }

    fn forget(&mut self, entity: &Entity) {
        if let Some(category) = entity.kind().category() {
            self.population.decrement(entity.side(), category);
        }
        debug!(id = %entity.id(), "entity retired");
    }

    /// Seeds one side's starting fleet.
    ///
    /// Entities that fail validation are logged and skipped. An unknown side
    /// skips the whole loadout. Returns the number of entities admitted.
    pub fn seed_side(&mut self, loadout: &SideLoadout) -> usize {
        let side = match loadout.side.parse::<Side>() {
            Ok(side) => side,
            Err(err) => {
                warn!(side = %loadout.side, error = %err, "skipping loadout");
                return 0;
            }
        };

        let mut admitted = 0;
        for _ in 0..loadout.cargo_ships {
            let built = CargoShip::new(
                side,
                loadout.cargo_ship_speed,
                loadout.cargo_ship_strength,
                loadout.decoys_per_ship,
                self,
            );
            admitted += usize::from(self.admit_built(built, EntityKind::CargoShip));
        }
        for _ in 0..loadout.space_ports {
            let built = SpacePort::new(
                side,
                loadout.space_port_speed,
                loadout.space_port_strength,
                loadout.bolts_per_port,
                self,
            );
            admitted += usize::from(self.admit_built(built, EntityKind::SpacePort));
        }
        for _ in 0..loadout.fighter_ships {
            let built = FighterShip::new(
                side,
                loadout.fighter_ship_speed,
                loadout.fighter_ship_strength,
                loadout.missiles_per_fighter,
                self,
            );
            admitted += usize::from(self.admit_built(built, EntityKind::FighterShip));
        }

        info!(side = %side, admitted, "side seeded");
        admitted
    }

    fn admit_built<E: Into<Entity>>(&mut self, built: Result<E, SimError>, kind: EntityKind) -> bool {
        match built {
            Ok(entity) => {
                self.admit(entity);
                true
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "entity construction failed");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    fn index_of(&self, id: &EntityId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|e| e.id() == id))
    }

    /// Returns an entity by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities().find(|e| e.id() == id)
    }

    /// Returns an entity mutably by id.
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.slots.iter_mut().flatten().find(|e| e.id() == id)
    }

    /// True if an entity with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of entities present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities().count()
    }

    /// True if no entities are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities().next().is_none()
    }

    /// Iterates entities in admission order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().flatten()
    }

    /// Current location of an entity, or `None` if it is not present.
    #[must_use]
    pub fn location_of(&self, id: &EntityId) -> Option<Point3D> {
        self.get(id).map(SpaceEntity::location)
    }

    /// World volume.
    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Completed sweeps.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Live ship and port counts.
    #[must_use]
    pub fn population(&self) -> &PopulationSummary {
        &self.population
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Nearest space port belonging to `side`.
    #[must_use]
    pub fn nearest_station(&self, point: Point3D, side: Side) -> Option<EntityId> {
        self.entities()
            .filter(|e| e.is_port() && e.side() == side)
            .min_by(|a, b| {
                point
                    .distance(a.location())
                    .total_cmp(&point.distance(b.location()))
            })
            .map(|e| e.id().clone())
    }

    /// Friendly cargo ships within docking range of `point`.
    #[must_use]
    pub fn find_docked_ships(&self, point: Point3D, side: Side) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.kind() == EntityKind::CargoShip && e.side() == side)
            .filter(|e| point.distance(e.location()) <= DOCKED_RANGE)
            .map(|e| e.id().clone())
            .collect()
    }

    /// Radar contacts around `origin` for an observer on `side`.
    ///
    /// Ships and ports within [`RADAR_RANGE`] (but not at distance zero) are
    /// candidates. Enemies are always reported; friendlies only about one
    /// time in a hundred. Results keep admission order.
    pub fn radar_sweep(&mut self, origin: Point3D, side: Side) -> Vec<EntityId> {
        let mut contacts = Vec::new();
        for entity in self.slots.iter().flatten() {
            let is_craft = entity.is_targetable()
                && !entity.kind().is_projectile()
                && entity.kind() != EntityKind::DebrisCloud;
            if is_craft
                && in_radar_range(origin, entity.location())
                && passes_side_filter(&mut self.rng, side, entity.side())
            {
                contacts.push(entity.id().clone());
            }
        }
        contacts
    }

    /// Decides what a missile on `side` at `origin` should chase next.
    ///
    /// Usually the current lock is kept as-is, even if its target is gone.
    /// Otherwise the missile takes the first of: an ordinary radar contact, or
    /// any other targetable non-missile in range, decoy clouds included.
    pub fn reacquire_lock(
        &mut self,
        origin: Point3D,
        current: &EntityId,
        side: Side,
    ) -> Option<EntityId> {
        if self.rng.gen::<f64>() <= LOCK_RETENTION {
            return Some(current.clone());
        }

        let mut candidates = self.radar_sweep(origin, side);
        for entity in self.slots.iter().flatten() {
            if entity.is_targetable()
                && entity.kind() != EntityKind::GuidedMissile
                && in_radar_range(origin, entity.location())
                && passes_side_filter(&mut self.rng, side, entity.side())
            {
                candidates.push(entity.id().clone());
            }
        }
        candidates.into_iter().next()
    }

    // -------------------------------------------------------------------------
    // Interactions
    // -------------------------------------------------------------------------

    /// Runs `f` on the entity in slot `index` with the entity checked out.
    fn with_checked_out<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Entity, &mut Self) -> R,
    ) -> Option<R> {
        let mut entity = self.slots.get_mut(index).and_then(Option::take)?;
        let result = f(&mut entity, self);
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(entity);
        }
        Some(result)
    }

    /// Tells `target` it has been locked by an attacker at `attacker`.
    pub fn radar_lock(&mut self, target: &EntityId, attacker: Point3D) {
        if let Some(index) = self.index_of(target) {
            self.with_checked_out(index, |entity, arena| {
                entity.react_to_radar_lock(attacker, arena);
            });
        }
    }

    /// Applies damage to one entity, if present.
    pub fn apply_damage_to(&mut self, id: &EntityId, amount: f64) {
        if let Some(index) = self.index_of(id) {
            self.with_checked_out(index, |entity, arena| entity.apply_damage(amount, arena));
        }
    }

    /// Blast centred on entity `origin`. No-op if it is not present.
    pub fn area_damage(&mut self, origin: &EntityId, radius: f64, max_damage: f64) {
        if let Some(center) = self.location_of(origin) {
            self.area_damage_at(center, radius, max_damage);
        }
    }

    /// Blast centred on `center`.
    ///
    /// Every entity within `radius` independently takes uniform damage in
    /// `[0, max_damage)`.
    pub fn area_damage_at(&mut self, center: Point3D, radius: f64, max_damage: f64) {
        let count = self.slots.len();
        for index in 0..count {
            let in_blast = self
                .slots
                .get(index)
                .and_then(Option::as_ref)
                .is_some_and(|e| e.location().distance(center) <= radius);
            if in_blast {
                let amount = self.rng.gen::<f64>() * max_damage;
                self.with_checked_out(index, |entity, arena| entity.apply_damage(amount, arena));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sweep
    // -------------------------------------------------------------------------

    /// Processes every entity once.
    ///
    /// For each entity present when the sweep starts: a destroyed entity is
    /// reported one last time and removed; anything else moves by `dt`, is
    /// reported, picks a new destination if it has arrived, and runs its
    /// update. The population summary is emitted at the end.
    pub fn sweep(&mut self, dt: f64, sink: &mut dyn RenderSink) {
        self.tick += 1;
        let _span = trace_span!("sweep", tick = self.tick).entered();

        let count = self.slots.len();
        for index in 0..count {
            let Some(mut entity) = self.slots.get_mut(index).and_then(Option::take) else {
                continue;
            };

            if entity.is_destroyed() {
                sink.update_item(entity.snapshot());
                self.forget(&entity);
                continue;
            }

            match entity.move_by(dt, self) {
                Ok(()) => sink.update_item(entity.snapshot()),
                Err(err) => warn!(id = %entity.id(), error = %err, "movement rejected"),
            }
            if entity.at_destination() {
                entity.reroute(self);
            }
            entity.update(self);

            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(entity);
            }
        }

        self.slots.retain(Option::is_some);
        sink.update_info(&self.population);
    }
}

impl PointSampler for Arena {
    fn random_point(&mut self) -> Point3D {
        self.bounds.sample(&mut self.rng)
    }
}

fn in_radar_range(origin: Point3D, p: Point3D) -> bool {
    let distance = origin.distance(p);
    distance > 0.0 && distance <= RADAR_RANGE
}

fn passes_side_filter(rng: &mut ChaCha8Rng, own: Side, other: Side) -> bool {
    other != own || rng.gen::<f64>() > FRIENDLY_CONTACT_THRESHOLD
}

// =============================================================================
// Tests
// =============================================================================
