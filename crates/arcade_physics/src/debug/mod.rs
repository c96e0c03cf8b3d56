//! Debug module for visualization and debugging tools
//!
//! Shapes are collected here and handed to whatever renderer the host
//! game uses; nothing in this module draws pixels.

pub mod collision_debug;
pub mod draw;

pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};
pub use draw::{DebugDrawSystem, DebugShape};
