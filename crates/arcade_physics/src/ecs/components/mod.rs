//! ECS Components module
//!
//! The components the collision core reads and writes.

pub mod transform;
pub mod collision;
pub mod physics_body;

pub use transform::WorldPosition;
pub use collision::{BoxCollider, ColliderCategory};
pub use physics_body::PhysicsBody;
