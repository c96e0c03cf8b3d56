//! Gravity and velocity integration for physics bodies

use crate::ecs::components::{BoxCollider, PhysicsBody, WorldPosition};
use crate::ecs::World;
use crate::foundation::math::Vec2;

/// Integrates every non-static body once per fixed tick
///
/// Clears `is_grounded` before moving; the collision pass that follows sets
/// it again for bodies still resting on something.
#[derive(Debug, Clone)]
pub struct BodySystem {
    gravity: Vec2,
}

impl BodySystem {
    /// Create a body system with the given world gravity
    pub fn new(gravity: Vec2) -> Self {
        Self { gravity }
    }

    /// World gravity
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Change world gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Apply gravity and move bodies by their velocity, returning how many moved
    pub fn update(&self, world: &mut World, dt: f32) -> usize {
        let mut moved = 0;
        for entity in world.entities_with::<PhysicsBody>() {
            let is_static = world
                .get_component::<BoxCollider>(entity)
                .is_some_and(|collider| collider.is_static);
            if is_static || !world.has_component::<WorldPosition>(entity) {
                continue;
            }

            let Some(body) = world.get_component_mut::<PhysicsBody>(entity) else {
                continue;
            };
            body.is_grounded = false;
            body.velocity += self.gravity * body.gravity_scale * dt;
            let delta = body.velocity * dt;

            if let Some(position) = world.get_component_mut::<WorldPosition>(entity) {
                position.translate(delta);
                moved += 1;
            }
        }
        moved
    }
}
