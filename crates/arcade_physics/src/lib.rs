//! # Arcade Physics
//!
//! A 2D collision core for arcade-style games.
//!
//! ## Features
//!
//! - **Quad-tree broad phase**: static colliders and triggers live in two
//!   spatial trees rebuilt whenever the static set changes
//! - **AABB narrow phase**: contact manifolds with minimum-translation axis selection
//! - **Depenetration**: damped positional correction against static colliders
//! - **Collision events**: Enter/Stay/Exit synthesized by diffing contacts across ticks
//! - **Fixed timestep**: accumulator with a safety cap against frame spikes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_physics::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SceneManager::new(SceneConfig::default())?;
//!
//!     scene.spawn_static(Vec2::new(0.0, 30.0), BoxCollider::new(200.0, 20.0))?;
//!     let crate_entity = scene.spawn_body(Vec2::new(0.0, 0.0), BoxCollider::new(20.0, 20.0))?;
//!
//!     for _ in 0..60 {
//!         scene.advance(1.0 / 60.0)?;
//!     }
//!
//!     for message in scene.events_mut().drain() {
//!         if message.receiver == crate_entity {
//!             println!("{:?}", message.event.kind);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        debug::{CollisionDebugVisualizer, DebugShape},
        ecs::{
            components::{BoxCollider, ColliderCategory, PhysicsBody, WorldPosition},
            Component, Entity, World,
        },
        events::{
            CollisionEvent, CollisionEventKind, ContactCategory, EventHandler, EventSystem,
            Message, MessageSink,
        },
        foundation::{
            math::Vec2,
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            BodySystem, CollisionConfig, CollisionError, CollisionSystem, ContactManifold,
            LayerMask, PairKey,
        },
        scene::{SceneConfig, SceneError, SceneManager},
        spatial::{QuadTree, QuadTreeConfig, Rect, SpatialError, StoragePolicy},
    };
}
