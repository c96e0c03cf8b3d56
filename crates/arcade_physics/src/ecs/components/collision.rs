//! Collision components for ECS
//!
//! A [`BoxCollider`] is pure configuration. Which registry it lands in is
//! derived from its flags by [`BoxCollider::category`]; the collision
//! system owns the registries themselves.

use crate::ecs::components::WorldPosition;
use crate::foundation::math::Vec2;
use crate::physics::LayerMask;
use crate::spatial::Rect;

/// Registry a collider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderCategory {
    /// Static solid geometry; dynamic bodies are pushed out of it
    StaticCollider,
    /// Static region that only reports overlaps
    StaticTrigger,
    /// Moving body, tested every tick
    Dynamic,
}

impl ColliderCategory {
    /// Whether this category lives in one of the static quad-trees
    pub fn is_static(self) -> bool {
        !matches!(self, ColliderCategory::Dynamic)
    }
}

/// Axis-aligned box collider attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCollider {
    /// Full width and height of the box
    pub size: Vec2,

    /// Offset of the box center from the entity's world position
    pub offset: Vec2,

    /// Report overlaps without physical response (only meaningful when static)
    pub is_trigger: bool,

    /// Never moves; stored in a quad-tree instead of scanned every tick
    pub is_static: bool,

    /// Layers this collider interacts with
    pub layer_mask: LayerMask,

    /// Should this collider be visualized in debug mode?
    pub debug_draw: bool,
}

impl BoxCollider {
    /// Create a dynamic, solid collider on all layers
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::zeros(),
            is_trigger: false,
            is_static: false,
            layer_mask: LayerMask::ALL,
            debug_draw: false,
        }
    }

    /// Offset the box from the entity origin
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Mark this collider as static
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark this collider as a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Restrict the layers this collider interacts with
    pub fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    /// Enable debug visualization
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug_draw = enabled;
        self
    }

    /// Registry this collider belongs to
    ///
    /// There is no moving trigger: a non-static collider is dynamic
    /// whatever its trigger flag says.
    pub fn category(&self) -> ColliderCategory {
        match (self.is_static, self.is_trigger) {
            (true, true) => ColliderCategory::StaticTrigger,
            (true, false) => ColliderCategory::StaticCollider,
            (false, _) => ColliderCategory::Dynamic,
        }
    }

    /// World-space rectangle for an entity at `position`
    pub fn world_rect(&self, position: &WorldPosition) -> Rect {
        Rect::from_center_size(position.position + self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_flags() {
        assert_eq!(BoxCollider::new(1.0, 1.0).category(), ColliderCategory::Dynamic);
        assert_eq!(BoxCollider::new(1.0, 1.0).as_trigger().category(), ColliderCategory::Dynamic);
        assert_eq!(BoxCollider::new(1.0, 1.0).as_static().category(), ColliderCategory::StaticCollider);
        assert_eq!(
            BoxCollider::new(1.0, 1.0).as_static().as_trigger().category(),
            ColliderCategory::StaticTrigger
        );
    }

    #[test]
    fn test_world_rect_applies_offset() {
        let collider = BoxCollider::new(4.0, 2.0).with_offset(Vec2::new(1.0, -1.0));
        let rect = collider.world_rect(&WorldPosition::new(10.0, 10.0));

        assert_eq!(rect.center(), Vec2::new(11.0, 9.0));
        assert_eq!(rect.left(), 9.0);
        assert_eq!(rect.top(), 8.0);
    }
}
