//! Scene Manager - owns the world and drives the physics systems

use crate::config::{Config, ConfigError};
use crate::debug::CollisionDebugVisualizer;
use crate::ecs::components::{BoxCollider, PhysicsBody, WorldPosition};
use crate::ecs::{Entity, World};
use crate::events::EventSystem;
use crate::foundation::math::Vec2;
use crate::foundation::time::{FixedTimestep, Stopwatch, TimestepConfig};
use crate::physics::{BodySystem, CollisionConfig, CollisionError, CollisionSystem, ContactReport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scene configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Collision system settings
    pub collision: CollisionConfig,

    /// Fixed-timestep settings
    pub timestep: TimestepConfig,
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Reject values the scene cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        if self.timestep.step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "timestep.step",
                reason: format!("must be positive, got {}", self.timestep.step),
            });
        }
        if self.timestep.max_frame_time < self.timestep.step {
            return Err(ConfigError::Invalid {
                field: "timestep.max_frame_time",
                reason: format!(
                    "must be at least one step ({}), got {}",
                    self.timestep.step, self.timestep.max_frame_time
                ),
            });
        }
        Ok(())
    }
}

/// Scene errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Collision setup or tick failure
    #[error(transparent)]
    Collision(#[from] CollisionError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Running totals for a scene
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneStats {
    /// Frames passed to [`SceneManager::advance`]
    pub frames: u64,

    /// Fixed ticks simulated
    pub ticks: u64,

    /// Frames dropped by the timestep safety cap
    pub dropped_frames: u64,

    /// Enter events across all categories
    pub contacts_entered: u64,

    /// Exit events across all categories
    pub contacts_exited: u64,

    /// Report of the most recent tick
    pub last_report: ContactReport,

    /// Wall time spent in the most recent tick
    pub last_tick_time: Duration,
}

/// Scene Manager - owns the ECS world and the systems that simulate it
pub struct SceneManager {
    config: SceneConfig,
    world: World,
    bodies: BodySystem,
    collision: CollisionSystem,
    events: EventSystem,
    timestep: FixedTimestep,
    stats: SceneStats,
}

impl SceneManager {
    /// Create an empty scene, rejecting a config that fails validation
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            bodies: BodySystem::new(config.collision.gravity),
            collision: CollisionSystem::new(config.collision)?,
            events: EventSystem::new(),
            timestep: FixedTimestep::from_config(&config.timestep),
            stats: SceneStats::default(),
            config,
        })
    }

    /// Create an empty scene from a `.toml` or `.ron` file, using defaults when it is missing
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Self::new(SceneConfig::load_or_default(path)?)
    }

    /// Active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    fn spawn(&mut self, position: Vec2, collider: BoxCollider, body: Option<PhysicsBody>) -> Result<Entity, SceneError> {
        let entity = self.world.create_entity();
        self.world.add_component(entity, WorldPosition::from_vec(position));
        self.world.add_component(entity, collider);
        if let Some(body) = body {
            self.world.add_component(entity, body);
        }

        if let Err(err) = self.collision.register(&self.world, entity) {
            self.world.destroy_entity(entity);
            return Err(err.into());
        }
        Ok(entity)
    }

    /// Spawn a static solid collider
    pub fn spawn_static(&mut self, position: Vec2, collider: BoxCollider) -> Result<Entity, SceneError> {
        let mut collider = collider.as_static();
        collider.is_trigger = false;
        self.spawn(position, collider, None)
    }

    /// Spawn a static trigger volume
    pub fn spawn_trigger(&mut self, position: Vec2, collider: BoxCollider) -> Result<Entity, SceneError> {
        self.spawn(position, collider.as_static().as_trigger(), None)
    }

    /// Spawn a dynamic body at rest
    pub fn spawn_body(&mut self, position: Vec2, collider: BoxCollider) -> Result<Entity, SceneError> {
        self.spawn_body_with(position, collider, PhysicsBody::default())
    }

    /// Spawn a dynamic body with an explicit physics body
    pub fn spawn_body_with(
        &mut self,
        position: Vec2,
        collider: BoxCollider,
        body: PhysicsBody,
    ) -> Result<Entity, SceneError> {
        let mut collider = collider;
        collider.is_static = false;
        self.spawn(position, collider, Some(body))
    }

    /// Remove an entity from the scene
    ///
    /// Contacts it was part of report `Exit` on the next tick.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if let Ok(category) = self.collision.unregister(entity) {
            log::debug!("Destroying {} ({:?})", entity, category);
        }
        self.world.destroy_entity(entity)
    }

    /// Simulate one fixed tick: integrate bodies, then collide
    pub fn step(&mut self) -> Result<ContactReport, SceneError> {
        let stopwatch = Stopwatch::start_new();

        self.bodies.update(&mut self.world, self.timestep.step());
        let report = self.collision.fixed_update(&mut self.world, &mut self.events)?;

        self.stats.ticks += 1;
        self.stats.contacts_entered += (report.collider.entered + report.trigger.entered + report.dynamic.entered) as u64;
        self.stats.contacts_exited += (report.collider.exited + report.trigger.exited + report.dynamic.exited) as u64;
        self.stats.last_report = report;
        self.stats.last_tick_time = stopwatch.elapsed();
        Ok(report)
    }

    /// Feed one frame's elapsed time and run the ticks it pays for
    ///
    /// Returns the number of ticks simulated.
    pub fn advance(&mut self, elapsed: f32) -> Result<u32, SceneError> {
        let ticks = self.timestep.accumulate(elapsed);
        for _ in 0..ticks {
            self.step()?;
        }
        self.stats.frames += 1;
        self.stats.dropped_frames = self.timestep.dropped_frames();
        Ok(ticks)
    }

    /// Draw every collider and recorded contact
    pub fn debug_draw(&self, visualizer: &mut CollisionDebugVisualizer) {
        self.collision.debug_draw(&self.world, visualizer);
    }

    /// Interpolation fraction left in the accumulator
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Running totals
    pub fn stats(&self) -> &SceneStats {
        &self.stats
    }

    /// ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Collision system
    pub fn collision_system(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Mutable collision system
    pub fn collision_system_mut(&mut self) -> &mut CollisionSystem {
        &mut self.collision
    }

    /// Body integration system
    pub fn body_system(&self) -> &BodySystem {
        &self.bodies
    }

    /// Event queue the collision system writes to
    pub fn events(&self) -> &EventSystem {
        &self.events
    }

    /// Mutable event queue
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollisionEventKind;
    use crate::physics::LayerMask;

    #[test]
    fn test_body_lands_on_floor() {
        let mut scene = SceneManager::new(SceneConfig::default()).unwrap();
        let floor = scene
            .spawn_static(Vec2::new(0.0, 40.0), BoxCollider::new(200.0, 20.0))
            .unwrap();
        let body = scene.spawn_body(Vec2::new(0.0, 0.0), BoxCollider::new(20.0, 20.0)).unwrap();

        for _ in 0..120 {
            scene.advance(1.0 / 60.0).unwrap();
        }

        let enters: Vec<_> = scene
            .events_mut()
            .drain()
            .into_iter()
            .filter(|m| m.event.kind == CollisionEventKind::Enter)
            .collect();
        assert_eq!(enters.len(), 2);
        assert!(enters.iter().any(|m| m.receiver == body && m.sender == floor));
        assert!(scene.world().get_component::<PhysicsBody>(body).unwrap().is_grounded);
        assert!(scene.collision_system().is_touching(body, floor));
        assert!(scene.stats().ticks >= 119);
    }

    #[test]
    fn test_spawn_forces_category() {
        let mut scene = SceneManager::new(SceneConfig::default()).unwrap();
        let wall = scene
            .spawn_static(Vec2::zeros(), BoxCollider::new(10.0, 10.0).as_trigger())
            .unwrap();
        let zone = scene.spawn_trigger(Vec2::new(50.0, 0.0), BoxCollider::new(10.0, 10.0)).unwrap();
        let body = scene
            .spawn_body(Vec2::new(-50.0, 0.0), BoxCollider::new(10.0, 10.0).as_static())
            .unwrap();

        let collision = scene.collision_system();
        assert_eq!(collision.static_collider_count(), 1);
        assert_eq!(collision.static_trigger_count(), 1);
        assert_eq!(collision.dynamic_count(), 1);
        assert!(collision.category_of(wall).is_some_and(|c| c.is_static()));
        assert!(collision.category_of(zone).is_some_and(|c| c.is_static()));
        assert!(collision.category_of(body).is_some_and(|c| !c.is_static()));
    }

    #[test]
    fn test_destroy_reports_exit() {
        let mut scene = SceneManager::new(SceneConfig {
            collision: CollisionConfig {
                gravity: Vec2::zeros(),
                ..CollisionConfig::default()
            },
            ..SceneConfig::default()
        })
        .unwrap();
        let a = scene
            .spawn_body(Vec2::zeros(), BoxCollider::new(10.0, 10.0).with_layer_mask(LayerMask::PLAYER))
            .unwrap();
        let b = scene
            .spawn_body(Vec2::new(5.0, 0.0), BoxCollider::new(10.0, 10.0).with_layer_mask(LayerMask::PLAYER))
            .unwrap();

        scene.step().unwrap();
        assert_eq!(scene.stats().contacts_entered, 1);

        assert!(scene.destroy(b));
        scene.step().unwrap();
        assert_eq!(scene.stats().contacts_exited, 1);
        assert!(!scene.collision_system().is_touching(a, b));
    }

    #[test]
    fn test_config_validation() {
        assert!(SceneConfig::default().validate().is_ok());

        let mut config = SceneConfig::default();
        config.timestep.step = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "timestep.step", .. })));

        let mut config = SceneConfig::default();
        config.timestep.max_frame_time = 0.001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SceneConfig::default();
        config.collision.depenetration.divisor = 0.0;
        assert!(matches!(
            SceneManager::new(config),
            Err(SceneError::Config(ConfigError::Invalid {
                field: "depenetration.divisor",
                ..
            }))
        ));

        let mut config = SceneConfig::default();
        config.timestep.step = -1.0;
        assert!(SceneManager::new(config).is_err());
    }

    #[test]
    fn test_positions_stay_finite_under_tuned_depenetration() {
        let mut config = SceneConfig::default();
        config.collision.depenetration.divisor = 0.5;
        config.collision.depenetration.skin = 0.0;
        let mut scene = SceneManager::new(config).unwrap();

        scene.spawn_static(Vec2::new(0.0, 15.0), BoxCollider::new(100.0, 20.0)).unwrap();
        let body = scene.spawn_body(Vec2::zeros(), BoxCollider::new(20.0, 20.0)).unwrap();
        for _ in 0..30 {
            scene.step().unwrap();
        }

        let position = scene.world().get_component::<WorldPosition>(body).unwrap().position;
        assert!(position.x.is_finite() && position.y.is_finite(), "{position:?}");
    }
}
