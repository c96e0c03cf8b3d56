//! Math utilities and types
//!
//! The collision core works in 2D world units. Vectors come from nalgebra.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// RGBA color used by debug drawing
pub type Vec4 = Vector4<f32>;

/// Unit vector along one axis, signed by `sign` (zero counts as positive)
pub fn axis_normal(axis: Axis, sign: f32) -> Vec2 {
    let s = if sign < 0.0 { -1.0 } else { 1.0 };
    match axis {
        Axis::X => Vec2::new(s, 0.0),
        Axis::Y => Vec2::new(0.0, s),
    }
}

/// One of the two world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// Component of `v` along this axis
    pub fn component(self, v: &Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Axis a unit normal is aligned with (the dominant component)
    pub fn of_normal(normal: &Vec2) -> Self {
        if normal.x.abs() >= normal.y.abs() {
            Axis::X
        } else {
            Axis::Y
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_normal_sign() {
        assert_eq!(axis_normal(Axis::X, -3.0), Vec2::new(-1.0, 0.0));
        assert_eq!(axis_normal(Axis::Y, 0.0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_axis_of_normal() {
        assert_eq!(Axis::of_normal(&Vec2::new(0.0, -1.0)), Axis::Y);
        assert_eq!(Axis::of_normal(&Vec2::new(1.0, 0.0)), Axis::X);
        assert_eq!(Axis::Y.component(&Vec2::new(2.0, 5.0)), 5.0);
    }
}
