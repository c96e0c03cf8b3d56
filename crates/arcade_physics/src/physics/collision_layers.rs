//! Collision layer masks for filtering contacts
//!
//! Every collider carries one 8-bit mask. Two colliders interact when
//! their masks share at least one bit.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// 8-bit collision layer mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct LayerMask: u8 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Enemy character layer
        const ENEMY = 1 << 1;
        /// Projectiles
        const PROJECTILE = 1 << 2;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes
        const TRIGGER = 1 << 4;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
        /// Vehicles
        const VEHICLE = 1 << 6;
        /// Pickups and collectibles
        const PICKUP = 1 << 7;
    }
}

impl LayerMask {
    /// No layers
    pub const NONE: Self = Self::empty();

    /// Every layer
    pub const ALL: Self = Self::all();

    /// Whether two masks share a layer
    ///
    /// ```
    /// use arcade_physics::physics::LayerMask;
    ///
    /// let player = LayerMask::PLAYER | LayerMask::ENVIRONMENT;
    /// assert!(player.interacts(LayerMask::ENVIRONMENT));
    /// assert!(!player.interacts(LayerMask::PICKUP));
    /// ```
    pub const fn interacts(self, other: Self) -> bool {
        self.intersects(other)
    }

    /// Combine several layers into one mask
    pub fn from_layers(layers: &[Self]) -> Self {
        layers.iter().fold(Self::NONE, |acc, layer| acc | *layer)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
