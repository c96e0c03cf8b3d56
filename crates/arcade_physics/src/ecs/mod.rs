//! Entity-Component-System implementation
//!
//! A deliberately small ECS: entities are ids, components live in one
//! typed store per component type, and systems are plain structs that
//! borrow the [`World`] for the duration of a tick.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;

pub use world::World;
pub use entity::Entity;
pub use component::Component;
