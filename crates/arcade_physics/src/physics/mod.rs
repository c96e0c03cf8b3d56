//! Physics module for collision detection and response
//!
//! Box colliders are partitioned into static colliders, static triggers and
//! dynamic bodies. Static geometry is indexed by quad-trees, contacts are
//! AABB manifolds, and contact histories turn per-tick overlaps into
//! Enter/Stay/Exit messages.

pub mod body_system;
pub mod collision_layers;
pub mod collision_system;
pub mod manifold;

#[cfg(test)]
mod tests;

pub use body_system::BodySystem;
pub use collision_layers::LayerMask;
pub use collision_system::{
    resolve_history_events, CollisionConfig, CollisionSystem, ContactReport, DepenetrationConfig, HistoryCounts,
};
pub use manifold::{ContactManifold, PairKey};

use crate::ecs::Entity;
use crate::spatial::SpatialError;

/// Collision system errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// An entity lacks a component the operation needs
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// Offending entity
        entity: Entity,
        /// Name of the missing component
        component: &'static str,
    },

    /// The entity is in none of the collider registries
    #[error("entity {0} is not registered with the collision system")]
    NotRegistered(Entity),

    /// Spatial structure failure
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}
