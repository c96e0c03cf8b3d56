//! Component trait and implementations

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

impl Component for crate::ecs::components::WorldPosition {}
impl Component for crate::ecs::components::BoxCollider {}
impl Component for crate::ecs::components::PhysicsBody {}
