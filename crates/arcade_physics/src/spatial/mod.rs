//! Spatial partitioning data structures
//!
//! Axis-aligned rectangles and the quad-tree used as the collision broad
//! phase.

mod quadtree;
mod rect;

pub use quadtree::{ItemKey, QuadItem, QuadTree, QuadTreeConfig, StoragePolicy};
pub use rect::Rect;

/// Spatial structure errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// The item does not touch the tree's bounds
    #[error("item {bounds:?} does not fit within tree bounds at all")]
    OutOfBounds {
        /// Bounds of the rejected item
        bounds: Rect,
    },
}
