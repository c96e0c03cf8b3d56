//! Axis-aligned rectangle used by the broad and narrow phase

use crate::foundation::math::Vec2;

/// Axis-aligned rectangle stored as center plus size
///
/// `top` is the edge with the smaller y. Edge accessors assume a
/// non-negative size; intermediate edits such as `set_left` past the right
/// edge can produce a negative one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Center x
    pub x: f32,
    /// Center y
    pub y: f32,
    /// Full width
    pub width: f32,
    /// Full height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its center and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from a center and size vector
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x, center.y, size.x, size.y)
    }

    /// Create a rectangle from its four edges
    pub fn from_bounds(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: (left + right) * 0.5,
            y: (top + bottom) * 0.5,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.x - self.width * 0.5
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Top edge (smaller y)
    pub fn top(&self) -> f32 {
        self.y - self.height * 0.5
    }

    /// Bottom edge (larger y)
    pub fn bottom(&self) -> f32 {
        self.y + self.height * 0.5
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half width and half height
    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Move the left edge, keeping the right edge fixed
    pub fn set_left(&mut self, left: f32) {
        *self = Self::from_bounds(left, self.top(), self.right(), self.bottom());
    }

    /// Move the right edge, keeping the left edge fixed
    pub fn set_right(&mut self, right: f32) {
        *self = Self::from_bounds(self.left(), self.top(), right, self.bottom());
    }

    /// Move the top edge, keeping the bottom edge fixed
    pub fn set_top(&mut self, top: f32) {
        *self = Self::from_bounds(self.left(), top, self.right(), self.bottom());
    }

    /// Move the bottom edge, keeping the top edge fixed
    pub fn set_bottom(&mut self, bottom: f32) {
        *self = Self::from_bounds(self.left(), self.top(), self.right(), bottom);
    }

    /// Grow the size around the current center
    pub fn expand_size(&mut self, dx: f32, dy: f32) {
        self.width += dx;
        self.height += dy;
    }

    /// Grow to the union of both rectangles
    pub fn encapsulate(&mut self, other: &Rect) {
        *self = Self::from_bounds(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        );
    }

    /// Open-interval overlap test; touching edges do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether `point` lies strictly inside
    pub fn overlaps_point(&self, point: Vec2) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.top() && point.y < self.bottom()
    }

    /// Strict containment; a shared edge does not count
    pub fn fully_contains(&self, other: &Rect) -> bool {
        other.left() > self.left()
            && other.right() < self.right()
            && other.top() > self.top()
            && other.bottom() < self.bottom()
    }

    /// Overlapping region of two rectangles
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::from_bounds(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Corner nearest to `point`
    pub fn closest_corner(&self, point: Vec2) -> Vec2 {
        let x = if (point.x - self.left()).abs() <= (point.x - self.right()).abs() {
            self.left()
        } else {
            self.right()
        };
        let y = if (point.y - self.top()).abs() <= (point.y - self.bottom()).abs() {
            self.top()
        } else {
            self.bottom()
        };
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_rects() -> Vec<Rect> {
        let mut rects = Vec::new();
        for x in [-10.0, -5.0, 0.0, 4.0, 9.0] {
            for y in [-8.0, 0.0, 5.0] {
                for (w, h) in [(2.0, 2.0), (10.0, 4.0), (20.0, 20.0)] {
                    rects.push(Rect::new(x, y, w, h));
                }
            }
        }
        rects
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let rects = sample_rects();
        for a in &rects {
            for b in &rects {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_containment_implies_overlap() {
        let rects = sample_rects();
        for a in &rects {
            for b in &rects {
                if a.fully_contains(b) {
                    assert!(a.overlaps(b), "{a:?} contains {b:?}");
                }
            }
        }

        // Overlap does not imply containment
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 0.0, 4.0, 4.0);
        assert!(a.overlaps(&b));
        assert!(!a.fully_contains(&b));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));

        // Sharing an edge is not containment either
        let inner = Rect::from_bounds(-5.0, -2.0, 0.0, 2.0);
        assert!(!a.fully_contains(&inner));
        assert!(!a.overlaps_point(Vec2::new(5.0, 0.0)));
        assert!(a.overlaps_point(Vec2::new(4.9, 0.0)));
    }

    #[test]
    fn test_from_bounds_edges() {
        let rect = Rect::from_bounds(-2.0, 1.0, 6.0, 5.0);
        assert_relative_eq!(rect.x, 2.0);
        assert_relative_eq!(rect.y, 3.0);
        assert_relative_eq!(rect.width, 8.0);
        assert_relative_eq!(rect.height, 4.0);
        assert_relative_eq!(rect.left(), -2.0);
        assert_relative_eq!(rect.bottom(), 5.0);
    }

    #[test]
    fn test_edge_setters_keep_opposite_edge() {
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        rect.set_left(-9.0);
        assert_relative_eq!(rect.left(), -9.0);
        assert_relative_eq!(rect.right(), 5.0);

        rect.set_bottom(20.0);
        assert_relative_eq!(rect.bottom(), 20.0);
        assert_relative_eq!(rect.top(), -5.0);

        rect.set_right(1.0);
        rect.set_top(0.0);
        assert_eq!(rect, Rect::from_bounds(-9.0, 0.0, 1.0, 20.0));
    }

    #[test]
    fn test_encapsulate_grows_to_union() {
        let mut rect = Rect::new(0.0, 0.0, 2.0, 2.0);
        rect.encapsulate(&Rect::new(10.0, -10.0, 2.0, 2.0));

        assert_relative_eq!(rect.left(), -1.0);
        assert_relative_eq!(rect.right(), 11.0);
        assert_relative_eq!(rect.top(), -11.0);
        assert_relative_eq!(rect.bottom(), 1.0);
        assert_relative_eq!(rect.x, 5.0);
    }

    #[test]
    fn test_intersection_region() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 0.0, 10.0, 10.0);
        let overlap = a.intersection(&b).unwrap();

        assert_relative_eq!(overlap.width, 2.0);
        assert_relative_eq!(overlap.height, 10.0);
        assert_relative_eq!(overlap.x, 4.0);
        assert!(a.intersection(&Rect::new(50.0, 0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_closest_corner() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(rect.closest_corner(Vec2::new(5.0, -7.0)), Vec2::new(2.0, -2.0));
        assert_eq!(rect.closest_corner(Vec2::new(-1.0, 1.0)), Vec2::new(-2.0, 2.0));
    }
}
