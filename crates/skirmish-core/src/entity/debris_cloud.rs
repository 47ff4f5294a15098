//! Short-lived debris clouds.
//!
//! Clouds serve three roles, distinguished only by their profile: targetable
//! gray decoys dropped by ships, small yellow splashes left by detonations,
//! and large yellow wrecks left by destroyed stations.

use super::{EntityKind, SpaceEntity};
use crate::arena::Arena;
use crate::error::{non_negative, SimError};
use crate::geometry::{format_point, Point3D, Polygon};
use crate::identity::{Identity, Side};
use crate::motion::{Movable, Stationary};

const OUTLINE: [(f64, f64); 24] = [
    (0.0, -13.0),
    (4.0, -15.0),
    (7.0, -14.0),
    (9.0, -9.0),
    (14.0, -7.0),
    (15.0, -4.0),
    (13.0, 0.0),
    (15.0, 4.0),
    (14.0, 7.0),
    (9.0, 9.0),
    (7.0, 14.0),
    (4.0, 15.0),
    (0.0, 13.0),
    (-4.0, 15.0),
    (-7.0, 14.0),
    (-9.0, 9.0),
    (-14.0, 7.0),
    (-15.0, 4.0),
    (-13.0, 0.0),
    (-15.0, -4.0),
    (-14.0, -7.0),
    (-9.0, -9.0),
    (-7.0, -14.0),
    (-4.0, -15.0),
];

/// Appearance and lifetime of a cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudProfile {
    /// Render color.
    pub side: Side,
    /// Outline scale.
    pub size_factor: f64,
    /// Ticks before the cloud disperses.
    pub lifetime: u32,
    /// True if radar may lock onto the cloud.
    pub targetable: bool,
}

impl CloudProfile {
    /// Decoy dropped by ships.
    pub const DECOY: Self = Self {
        side: Side::Gray,
        size_factor: 1.0,
        lifetime: 200,
        targetable: true,
    };

    /// Splash left by a detonating projectile.
    pub const SPLASH: Self = Self {
        side: Side::Yellow,
        size_factor: 0.25,
        lifetime: 40,
        targetable: false,
    };

    /// Wreckage of a destroyed station.
    pub const WRECK: Self = Self {
        side: Side::Yellow,
        size_factor: 2.0,
        lifetime: 200,
        targetable: true,
    };
}

/// Debris cloud state.
#[derive(Debug)]
pub struct DebrisCloud {
    identity: Identity,
    motion: Stationary,
    size_factor: f64,
    lifetime: u32,
    targetable: bool,
    shape: Polygon,
}

impl DebrisCloud {
    /// Creates a cloud at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative size factor.
    pub fn new(
        side: Side,
        location: Point3D,
        size_factor: f64,
        lifetime: u32,
        targetable: bool,
    ) -> Result<Self, SimError> {
        let size_factor = non_negative("size_factor", size_factor)?;
        Ok(Self {
            identity: Identity::new(side, EntityKind::DebrisCloud),
            motion: Stationary::new(location),
            size_factor,
            lifetime,
            targetable,
            shape: Polygon::from_points(&OUTLINE).scaled(size_factor),
        })
    }

    /// Creates a cloud from a profile.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidNumeric`] for a negative size factor.
    pub fn from_profile(profile: &CloudProfile, location: Point3D) -> Result<Self, SimError> {
        Self::new(
            profile.side,
            location,
            profile.size_factor,
            profile.lifetime,
            profile.targetable,
        )
    }

    /// Ticks left.
    #[must_use]
    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Outline scale.
    #[must_use]
    pub fn size_factor(&self) -> f64 {
        self.size_factor
    }
}

impl SpaceEntity for DebrisCloud {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn kind(&self) -> EntityKind {
        EntityKind::DebrisCloud
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

    fn update(&mut self, _arena: &mut Arena) {
        self.lifetime = self.lifetime.saturating_sub(1);
    }

    fn at_destination(&self) -> bool {
        true
    }

    fn is_destroyed(&self) -> bool {
        self.lifetime == 0
    }

    fn is_damaged(&self) -> bool {
        false
    }

    fn apply_damage(&mut self, _amount: f64, _arena: &mut Arena) {}

    fn is_targetable(&self) -> bool {
        self.targetable
    }

    fn shape(&self) -> &Polygon {
        &self.shape
    }

    fn status_text(&self) -> String {
        format!(
            "ID: {}\nLocation: {}\nDuration: {}\nTargetable: {}",
            self.id(),
            format_point(self.location()),
            self.lifetime,
            self.targetable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WorldBounds;

    #[test]
    fn disperses_after_lifetime() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 61);
        let mut cloud = DebrisCloud::new(Side::Gray, Point3D::ONE, 1.0, 3, true).unwrap();

        cloud.update(&mut arena);
        cloud.update(&mut arena);
        assert!(!cloud.is_destroyed());
        cloud.update(&mut arena);
        assert!(cloud.is_destroyed());
        cloud.update(&mut arena);
        assert_eq!(cloud.lifetime(), 0);
    }

    #[test]
    fn outline_scales_with_size() {
        let cloud = DebrisCloud::from_profile(&CloudProfile::WRECK, Point3D::ZERO).unwrap();
        assert_eq!(cloud.shape().len(), 24);
        assert!((cloud.shape().vertices()[0].y + 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn immune_to_damage() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 62);
        let mut cloud = DebrisCloud::from_profile(&CloudProfile::SPLASH, Point3D::ZERO).unwrap();
        cloud.apply_damage(1e6, &mut arena);
        assert!(!cloud.is_destroyed());
        assert!(!cloud.is_damaged());
        assert!(!cloud.is_targetable());
    }

    #[test]
    fn rejects_negative_size_and_interval() {
        let mut arena = Arena::with_seed(WorldBounds::default(), 63);
        assert!(DebrisCloud::new(Side::Gray, Point3D::ZERO, -1.0, 10, true).is_err());
        let mut cloud = DebrisCloud::from_profile(&CloudProfile::DECOY, Point3D::ZERO).unwrap();
        assert!(cloud.move_by(-1.0, &mut arena).is_err());
    }
}
