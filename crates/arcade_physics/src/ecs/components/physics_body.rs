//! Physics body component
//!
//! Velocity and contact state for dynamic bodies. Integration happens in
//! [`crate::physics::BodySystem`]; the collision system only reads and
//! corrects it.

use crate::foundation::math::Vec2;

/// Velocity-carrying body for a dynamic entity
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Set during a tick when the body rests on something below it
    pub is_grounded: bool,

    /// Multiplier on world gravity (0 = floating)
    pub gravity_scale: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::zeros(),
            is_grounded: false,
            gravity_scale: 1.0,
        }
    }
}

impl PhysicsBody {
    /// Create a body with an initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }

    /// Set gravity scale
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Remove the part of the velocity heading along `direction`
    ///
    /// Only motion *into* `direction` is cancelled; a body already moving
    /// away keeps its velocity.
    pub fn cancel_velocity_along(&mut self, direction: Vec2) {
        let Some(direction) = direction.try_normalize(f32::EPSILON) else {
            return;
        };
        let along = self.velocity.dot(&direction);
        if along > 0.0 {
            self.velocity -= direction * along;
        }
    }
}
