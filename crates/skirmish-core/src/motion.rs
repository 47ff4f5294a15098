//! Motion providers composed into entities.
//!
//! Three providers cover every entity kind:
//!
//! - [`FreeRoam`]: wanders between random points (ships, stations)
//! - [`Guided`]: flies from a launch point toward a destination that the owner
//!   may keep retargeting, and reports arrival exactly once (projectiles)
//! - [`Stationary`]: never moves (debris clouds)
//!
//! All providers share the same straight-line interpolation: a step covers
//! `speed * dt`, never overshoots, and snaps exactly onto the destination when
//! the remaining distance is covered.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::error::{non_negative, SimError};
use crate::geometry::Point3D;

/// Result of a single motion step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing to do; already at the destination.
    Stayed,
    /// Advanced toward the destination without reaching it.
    Moved,
    /// Reached the destination this step.
    Arrived,
}

/// Source of random points inside the world.
pub trait PointSampler {
    /// Draws a point uniformly from the world volume.
    fn random_point(&mut self) -> Point3D;
}

/// Shared motion surface of all providers.
pub trait Movable {
    /// Current position.
    fn location(&self) -> Point3D;
    /// Current goal.
    fn destination(&self) -> Point3D;
    /// Distance covered per unit of time.
    fn speed(&self) -> f64;
    /// Heading in radians, for rendering.
    fn heading(&self) -> f64;
    /// True once the provider considers itself arrived.
    fn at_destination(&self) -> bool;
    /// Advances by `dt` time units.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInterval`] if `dt` is negative.
    fn move_by(&mut self, dt: f64) -> Result<MoveOutcome, SimError>;
    /// Places the provider at `p`.
    fn set_location(&mut self, p: Point3D);
    /// Points the provider at `p`.
    fn set_destination_to(&mut self, p: Point3D);
}

pub(crate) fn check_interval(dt: f64) -> Result<f64, SimError> {
    if dt >= 0.0 {
        Ok(dt)
    } else {
        Err(SimError::InvalidInterval(dt))
    }
}

/// One interpolation step. Heading only changes on a partial step.
fn step_toward(
    location: &mut Point3D,
    heading: &mut f64,
    destination: Point3D,
    speed: f64,
    dt: f64,
) -> MoveOutcome {
    let remaining = location.distance(destination);
    if remaining <= 0.0 {
        return MoveOutcome::Stayed;
    }

    let traveled = speed * dt;
    if traveled >= remaining {
        *location = destination;
        return MoveOutcome::Arrived;
    }

    let previous = *location;
    *location += (destination - previous) * (traveled / remaining);
    let delta = *location - previous;
    *heading = delta.y.atan2(delta.x) + FRAC_PI_2;
    MoveOutcome::Moved
}

// =============================================================================
// Free Roam
// =============================================================================

/// Wandering motion between random points.
///
/// `set_destination_to` assigns the location, not the destination. Damaged
/// cargo ships rely on this to jump straight to their station.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeRoam {
    location: Point3D,
    destination: Point3D,
    speed: f64,
    heading: f64,
}

impl FreeRoam {
    /// Creates a provider at a random point heading for another random point.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative speed.
    pub fn new<S: PointSampler + ?Sized>(
        speed: f64,
        heading: f64,
        sampler: &mut S,
    ) -> Result<Self, SimError> {
        let speed = non_negative("speed", speed)?;
        let location = sampler.random_point();
        let destination = sampler.random_point();
        Ok(Self {
            location,
            destination,
            speed,
            heading,
        })
    }

    /// Overrides both endpoints.
    pub fn place(&mut self, location: Point3D, destination: Point3D) {
        self.location = location;
        self.destination = destination;
    }

    /// Picks a fresh random destination.
    pub fn reroute<S: PointSampler + ?Sized>(&mut self, sampler: &mut S) {
        self.destination = sampler.random_point();
    }
}

impl Movable for FreeRoam {
    fn location(&self) -> Point3D {
        self.location
    }

    fn destination(&self) -> Point3D {
        self.destination
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn at_destination(&self) -> bool {
        self.location.distance(self.destination) == 0.0
    }

    fn move_by(&mut self, dt: f64) -> Result<MoveOutcome, SimError> {
        let dt = check_interval(dt)?;
        Ok(step_toward(
            &mut self.location,
            &mut self.heading,
            self.destination,
            self.speed,
            dt,
        ))
    }

    fn set_location(&mut self, p: Point3D) {
        self.location = p;
    }

    fn set_destination_to(&mut self, p: Point3D) {
        self.location = p;
    }
}

// =============================================================================
// Guided
// =============================================================================

/// Point-to-point flight for projectiles.
///
/// [`MoveOutcome::Arrived`] is reported at most once. The owner reacts to it
/// by detonating. Arrival needs a nonzero distance to cover, so a flight whose
/// destination equals its location stays put and never arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct Guided {
    location: Point3D,
    destination: Point3D,
    speed: f64,
    heading: f64,
    arrived: bool,
}

impl Guided {
    /// Creates a provider flying from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative speed.
    pub fn new(speed: f64, heading: f64, start: Point3D, end: Point3D) -> Result<Self, SimError> {
        Ok(Self {
            location: start,
            destination: end,
            speed: non_negative("speed", speed)?,
            heading,
            arrived: false,
        })
    }

    /// True once arrival has been reported.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }
}

impl Movable for Guided {
    fn location(&self) -> Point3D {
        self.location
    }

    fn destination(&self) -> Point3D {
        self.destination
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn at_destination(&self) -> bool {
        self.arrived
    }

    fn move_by(&mut self, dt: f64) -> Result<MoveOutcome, SimError> {
        let dt = check_interval(dt)?;
        if self.arrived {
            return Ok(MoveOutcome::Stayed);
        }
        let outcome = step_toward(
            &mut self.location,
            &mut self.heading,
            self.destination,
            self.speed,
            dt,
        );
        if outcome == MoveOutcome::Arrived {
            self.arrived = true;
        }
        Ok(outcome)
    }

    fn set_location(&mut self, p: Point3D) {
        self.location = p;
    }

    fn set_destination_to(&mut self, p: Point3D) {
        self.destination = p;
    }
}

// =============================================================================
// Stationary
// =============================================================================

/// Fixed position. Always considered arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct Stationary {
    location: Point3D,
}

impl Stationary {
    /// Creates a provider fixed at `location`.
    #[must_use]
    pub fn new(location: Point3D) -> Self {
        Self { location }
    }
}

impl Movable for Stationary {
    fn location(&self) -> Point3D {
        self.location
    }

    fn destination(&self) -> Point3D {
        self.location
    }

    fn speed(&self) -> f64 {
        0.0
    }

    /// A fresh random angle on every call, so clouds shimmer on screen.
    fn heading(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..TAU)
    }

    fn at_destination(&self) -> bool {
        true
    }

    fn move_by(&mut self, dt: f64) -> Result<MoveOutcome, SimError> {
        check_interval(dt)?;
        Ok(MoveOutcome::Stayed)
    }

    fn set_location(&mut self, p: Point3D) {
        self.location = p;
    }

    fn set_destination_to(&mut self, _p: Point3D) {}
}
