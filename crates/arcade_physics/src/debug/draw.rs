//! Debug drawing primitives and system
//!
//! Shapes expire after their duration. A duration of zero lasts until the
//! next `update`.

use crate::foundation::math::{Vec2, Vec4};
use crate::spatial::Rect;

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Axis-aligned rectangle
    Rect {
        /// Center point
        center: Vec2,
        /// Full width and height
        size: Vec2,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
        /// Filled instead of outlined
        filled: bool,
    },

    /// Line segment from start to end
    Line {
        /// Start point
        start: Vec2,
        /// End point
        end: Vec2,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Point at position
    Point {
        /// Position
        position: Vec2,
        /// RGBA color
        color: Vec4,
        /// Size in pixels
        size: f32,
        /// Seconds left to live
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Rect { duration, .. }
            | DebugShape::Line { duration, .. }
            | DebugShape::Point { duration, .. } => duration,
        }
    }

    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Rect { duration, .. }
            | DebugShape::Line { duration, .. }
            | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        *self.duration_mut() = new_duration;
        self
    }

    /// Decrease duration by `delta_time`, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Debug drawing system for collecting debug shapes
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            enabled: true,
        }
    }

    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.temporary_shapes.push(shape);
        }
    }

    /// Draw a rectangle outline (temporary)
    pub fn draw_rect(&mut self, rect: &Rect, color: Vec4, duration: f32) {
        self.push(DebugShape::Rect {
            center: rect.center(),
            size: rect.size(),
            color,
            duration,
            filled: false,
        });
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Vec4, duration: f32) {
        self.push(DebugShape::Line {
            start,
            end,
            color,
            duration,
        });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec2, color: Vec4, size: f32, duration: f32) {
        self.push(DebugShape::Point {
            position,
            color,
            size,
            duration,
        });
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering
    pub fn shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }
        self.temporary_shapes.iter().collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len()
    }

    /// Clear all shapes
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();
        system.draw_rect(&Rect::new(0.0, 0.0, 2.0, 2.0), Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_ignores_shapes() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;
        system.draw_line(Vec2::zeros(), Vec2::new(1.0, 1.0), Vec4::new(0.0, 1.0, 0.0, 1.0), 1.0);

        assert_eq!(system.shape_count(), 0);
        assert!(system.shapes().is_empty());
    }

    #[test]
    fn test_with_duration() {
        let shape = DebugShape::Line {
            start: Vec2::zeros(),
            end: Vec2::new(1.0, 0.0),
            color: Vec4::new(0.0, 0.0, 1.0, 1.0),
            duration: 0.0,
        }
        .with_duration(2.5);
        assert_eq!(shape.duration(), 2.5);
    }
}
