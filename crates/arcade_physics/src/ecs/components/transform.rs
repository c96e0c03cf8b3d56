//! World position component
//!
//! Pure data: the world-space origin of an entity. Colliders are placed
//! relative to it.

use crate::foundation::math::Vec2;

/// World-space position of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPosition {
    /// Position in world units
    pub position: Vec2,
}

impl WorldPosition {
    /// Create a position from coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: Vec2::new(x, y) }
    }

    /// Create a position from a vector
    pub fn from_vec(position: Vec2) -> Self {
        Self { position }
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
