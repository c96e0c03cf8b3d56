//! Scene management
//!
//! A [`SceneManager`] owns one ECS world together with the systems that
//! simulate it and drives them from a fixed-timestep accumulator:
//!
//! ```text
//! frame time → FixedTimestep → step() × N
//!                                 ├─ BodySystem::update
//!                                 └─ CollisionSystem::fixed_update → EventSystem
//! ```

mod scene_manager;

pub use scene_manager::{SceneConfig, SceneError, SceneManager, SceneStats};
