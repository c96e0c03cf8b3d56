//! Contact manifolds between two axis-aligned boxes

use crate::ecs::Entity;
use crate::foundation::math::{axis_normal, Axis, Vec2};
use crate::spatial::Rect;

/// Unordered identity of a colliding pair
///
/// Stored as `(min, max)` so `(a, b)` and `(b, a)` produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(Entity, Entity);

impl PairKey {
    /// Build the key for two entities in any order
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// Lower entity of the pair
    pub fn first(&self) -> Entity {
        self.0
    }

    /// Higher entity of the pair
    pub fn second(&self) -> Entity {
        self.1
    }

    /// Whether `entity` is part of this pair
    pub fn contains(&self, entity: Entity) -> bool {
        self.0 == entity || self.1 == entity
    }
}

/// Contact between a dynamic body `col_a` and another collider `col_b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    /// The actively processed body
    pub col_a: Entity,
    /// The collider it touched
    pub col_b: Entity,
    /// World rect of A when the contact was built
    pub rect_a: Rect,
    /// World rect of B when the contact was built
    pub rect_b: Rect,
    /// Unit axis vector pointing from A toward B
    pub normal: Vec2,
    /// Overlap along `normal`
    pub penetration: f32,
    /// Center of the overlapping region
    pub hit: Vec2,
}

impl ContactManifold {
    /// Build a manifold when the two rects overlap
    ///
    /// Separation is along the axis with the smaller overlap; ties go to Y.
    pub fn between(col_a: Entity, rect_a: Rect, col_b: Entity, rect_b: Rect) -> Option<Self> {
        let ab = rect_b.center() - rect_a.center();
        let half_a = rect_a.half_size();
        let half_b = rect_b.half_size();

        let x_overlap = half_a.x + half_b.x - ab.x.abs();
        if x_overlap <= 0.0 {
            return None;
        }
        let y_overlap = half_a.y + half_b.y - ab.y.abs();
        if y_overlap <= 0.0 {
            return None;
        }

        let (axis, penetration) = if x_overlap < y_overlap {
            (Axis::X, x_overlap)
        } else {
            (Axis::Y, y_overlap)
        };
        let normal = axis_normal(axis, axis.component(&ab));

        let hit = rect_a
            .intersection(&rect_b)
            .map_or_else(|| rect_a.center() + ab * 0.5, |overlap| overlap.center());

        Some(Self {
            col_a,
            col_b,
            rect_a,
            rect_b,
            normal,
            penetration,
            hit,
        })
    }

    /// Unordered pair identity
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.col_a, self.col_b)
    }

    /// Whether both manifolds describe the same two entities, in either order
    pub fn is_same_pair(&self, other: &Self) -> bool {
        self.pair_key() == other.pair_key()
    }

    /// The entity on the other side of the contact from `entity`
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if entity == self.col_a {
            Some(self.col_b)
        } else if entity == self.col_b {
            Some(self.col_a)
        } else {
            None
        }
    }

    /// Separating axis of the contact
    pub fn axis(&self) -> Axis {
        Axis::of_normal(&self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entities() -> (Entity, Entity) {
        (Entity::new(1), Entity::new(2))
    }

    #[test]
    fn test_smaller_overlap_selects_axis() {
        let (a, b) = entities();
        let manifold = ContactManifold::between(
            a,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            b,
            Rect::new(8.0, 0.0, 10.0, 10.0),
        )
        .unwrap();

        assert_eq!(manifold.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(manifold.penetration, 2.0);
        assert_relative_eq!(manifold.hit.x, 4.0);
        assert_relative_eq!(manifold.hit.y, 0.0);
        assert_eq!(manifold.axis(), Axis::X);
    }

    #[test]
    fn test_normal_points_from_a_to_b() {
        let (a, b) = entities();
        let manifold = ContactManifold::between(
            a,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            b,
            Rect::new(-1.0, -8.0, 10.0, 10.0),
        )
        .unwrap();

        assert_eq!(manifold.normal, Vec2::new(0.0, -1.0));
        assert_relative_eq!(manifold.penetration, 2.0);
    }

    #[test]
    fn test_tie_goes_to_y_and_zero_offset_points_positive() {
        let (a, b) = entities();
        let manifold = ContactManifold::between(
            a,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            b,
            Rect::new(0.0, 0.0, 10.0, 10.0),
        )
        .unwrap();

        assert_eq!(manifold.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(manifold.penetration, 10.0);
    }

    #[test]
    fn test_touching_rects_make_no_contact() {
        let (a, b) = entities();
        assert!(ContactManifold::between(
            a,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            b,
            Rect::new(10.0, 0.0, 10.0, 10.0),
        )
        .is_none());
    }

    #[test]
    fn test_pair_identity_is_unordered() {
        let (a, b) = entities();
        let ra = Rect::new(0.0, 0.0, 10.0, 10.0);
        let rb = Rect::new(5.0, 5.0, 10.0, 10.0);
        let ab = ContactManifold::between(a, ra, b, rb).unwrap();
        let ba = ContactManifold::between(b, rb, a, ra).unwrap();

        assert!(ab.is_same_pair(&ba));
        assert!(ba.is_same_pair(&ab));
        assert_eq!(ab.pair_key(), PairKey::new(b, a));
        assert_eq!(ab.other(a), Some(b));
        assert_eq!(ab.other(Entity::new(9)), None);

        let c = Entity::new(3);
        let ac = ContactManifold::between(a, ra, c, rb).unwrap();
        assert!(!ab.is_same_pair(&ac));
    }

    #[test]
    fn test_copy_keeps_both_entities() {
        let (a, b) = entities();
        let original =
            ContactManifold::between(a, Rect::new(0.0, 0.0, 4.0, 4.0), b, Rect::new(1.0, 0.0, 4.0, 4.0)).unwrap();
        let copy = original;

        assert_eq!(copy.col_a, a);
        assert_eq!(copy.col_b, b);
    }
}
