//! Collision-specific debug visualization

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::ecs::components::ColliderCategory;
use crate::foundation::math::Vec4;
use crate::physics::ContactManifold;
use crate::spatial::Rect;

/// Color scheme for collision visualization
#[derive(Clone, Copy, Debug)]
pub struct CollisionDebugColors {
    /// Static solid geometry
    pub static_collider: Vec4,

    /// Static trigger volumes
    pub static_trigger: Vec4,

    /// Dynamic bodies
    pub dynamic: Vec4,

    /// Contact hit points
    pub contact_point: Vec4,

    /// Contact normals
    pub contact_normal: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            static_collider: Vec4::new(0.0, 1.0, 0.0, 0.3),  // Green, semi-transparent
            static_trigger: Vec4::new(0.5, 0.8, 1.0, 0.15),  // Light blue, transparent
            dynamic: Vec4::new(1.0, 1.0, 0.0, 0.5),          // Yellow
            contact_point: Vec4::new(1.0, 0.0, 0.0, 1.0),    // Red
            contact_normal: Vec4::new(1.0, 0.0, 1.0, 1.0),   // Magenta
        }
    }
}

/// Collision-specific debug visualizer
///
/// Shapes last one frame; call [`CollisionDebugVisualizer::update`] after
/// rendering to expire them.
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,

    /// Show collider outlines
    pub show_colliders: bool,

    /// Show hit points and normals of recorded contacts
    pub show_contacts: bool,

    /// Only outline colliders whose `debug_draw` flag is set
    pub flagged_only: bool,

    /// Length of drawn contact normals in world units
    pub normal_length: f32,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            show_colliders: true,
            show_contacts: true,
            flagged_only: false,
            normal_length: 8.0,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Outline one collider in its category color
    pub fn draw_collider(&mut self, rect: &Rect, category: ColliderCategory, flagged: bool) {
        if !self.show_colliders || (self.flagged_only && !flagged) {
            return;
        }
        let color = match category {
            ColliderCategory::StaticCollider => self.colors.static_collider,
            ColliderCategory::StaticTrigger => self.colors.static_trigger,
            ColliderCategory::Dynamic => self.colors.dynamic,
        };
        self.debug_draw.draw_rect(rect, color, 0.0);
    }

    /// Mark a contact's hit point and normal
    pub fn draw_contact(&mut self, manifold: &ContactManifold) {
        if !self.show_contacts {
            return;
        }
        self.debug_draw.draw_point(manifold.hit, self.colors.contact_point, 4.0, 0.0);
        self.debug_draw.draw_line(
            manifold.hit,
            manifold.hit + manifold.normal * self.normal_length,
            self.colors.contact_normal,
            0.0,
        );
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Update debug system (expire temporary shapes)
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// Get all debug shapes for rendering
    pub fn shapes(&self) -> Vec<&DebugShape> {
        self.debug_draw.shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;

    #[test]
    fn test_collider_colors_follow_category() {
        let mut viz = CollisionDebugVisualizer::new();
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        viz.draw_collider(&rect, ColliderCategory::StaticTrigger, false);

        let shapes = viz.shapes();
        assert_eq!(shapes.len(), 1);
        assert!(matches!(
            shapes[0],
            DebugShape::Rect { color, .. } if *color == CollisionDebugColors::default().static_trigger
        ));
    }

    #[test]
    fn test_flagged_only_filter() {
        let mut viz = CollisionDebugVisualizer::new();
        viz.flagged_only = true;
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);

        viz.draw_collider(&rect, ColliderCategory::Dynamic, false);
        assert!(viz.shapes().is_empty());
        viz.draw_collider(&rect, ColliderCategory::Dynamic, true);
        assert_eq!(viz.shapes().len(), 1);
    }

    #[test]
    fn test_contact_draws_point_and_normal_for_one_frame() {
        let mut viz = CollisionDebugVisualizer::new();
        let manifold = ContactManifold::between(
            Entity::new(0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Entity::new(1),
            Rect::new(8.0, 0.0, 10.0, 10.0),
        )
        .unwrap();

        viz.draw_contact(&manifold);
        assert_eq!(viz.shapes().len(), 2);

        viz.update(0.016);
        assert!(viz.shapes().is_empty());
    }

    #[test]
    fn test_custom_colors() {
        let colors = CollisionDebugColors {
            dynamic: Vec4::new(0.2, 0.4, 0.6, 1.0),
            ..CollisionDebugColors::default()
        };
        let mut viz = CollisionDebugVisualizer::new().with_colors(colors);
        viz.draw_collider(&Rect::new(0.0, 0.0, 4.0, 4.0), ColliderCategory::Dynamic, false);

        assert!(matches!(
            viz.shapes()[0],
            DebugShape::Rect { color, .. } if *color == colors.dynamic
        ));
    }
}
