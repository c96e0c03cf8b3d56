//! Collision sandbox
//!
//! Headless scene that drops a handful of crates onto a floor with a trigger
//! zone in the middle and logs every contact that starts or ends.
//!
//! Usage: `collision_sandbox [config.toml|config.ron] [seconds]`

use arcade_physics::foundation::time::Timer;
use arcade_physics::prelude::*;
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 4.0;
const CRATE_COUNT: usize = 12;

#[derive(thiserror::Error, Debug)]
enum SandboxError {
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid duration '{0}'")]
    Duration(String),
}

/// Logs each contact change and keeps a running count
struct ContactLogger {
    seen: Rc<Cell<u64>>,
}

impl EventHandler for ContactLogger {
    fn on_event(&mut self, message: &Message) -> bool {
        self.seen.set(self.seen.get() + 1);
        log::info!(
            "{:?} {:?}: {:?} -> {:?} (normal {:?}, depth {:.3})",
            message.event.category,
            message.event.kind,
            message.sender,
            message.receiver,
            message.event.manifold.normal,
            message.event.manifold.penetration,
        );
        false
    }
}

struct Sandbox {
    scene: SceneManager,
    visualizer: CollisionDebugVisualizer,
    crates: Vec<Entity>,
    handled: Rc<Cell<u64>>,
}

impl Sandbox {
    fn new(config_path: Option<&str>) -> Result<Self, SandboxError> {
        let scene = match config_path {
            Some(path) => {
                log::info!("Loading scene config from {path}");
                SceneManager::from_config_file(path)?
            }
            None => SceneManager::new(SceneConfig::default())?,
        };

        Ok(Self {
            scene,
            visualizer: CollisionDebugVisualizer::new(),
            crates: Vec::new(),
            handled: Rc::new(Cell::new(0)),
        })
    }

    fn initialize(&mut self) -> Result<(), SandboxError> {
        let down = self.scene.config().collision.gravity.y.signum();
        let floor_y = 200.0 * if down == 0.0 { 1.0 } else { down };

        self.scene.spawn_static(Vec2::new(0.0, floor_y), BoxCollider::new(640.0, 20.0))?;
        self.scene.spawn_static(Vec2::new(-330.0, 0.0), BoxCollider::new(20.0, 420.0))?;
        self.scene.spawn_static(Vec2::new(330.0, 0.0), BoxCollider::new(20.0, 420.0))?;
        self.scene.spawn_trigger(
            Vec2::new(0.0, floor_y * 0.5),
            BoxCollider::new(120.0, 60.0).with_layer_mask(LayerMask::TRIGGER | LayerMask::DEBRIS),
        )?;

        let mut rng = rand::thread_rng();
        for _ in 0..CRATE_COUNT {
            let position = Vec2::new(rng.gen_range(-280.0..280.0), rng.gen_range(0.0..180.0) * -down);
            let size = rng.gen_range(12.0..32.0);
            let entity = self.scene.spawn_body(position, BoxCollider::new(size, size))?;
            self.crates.push(entity);
        }

        for kind in [CollisionEventKind::Enter, CollisionEventKind::Exit] {
            self.scene.events_mut().register_handler(
                kind,
                Box::new(ContactLogger {
                    seen: Rc::clone(&self.handled),
                }),
            );
        }

        log::info!(
            "Scene ready: {} static colliders, {} triggers, {} crates",
            self.scene.collision_system().static_collider_count(),
            self.scene.collision_system().static_trigger_count(),
            self.crates.len()
        );
        Ok(())
    }

    fn run(&mut self, seconds: f32) -> Result<(), SandboxError> {
        let frames = (seconds / FRAME_TIME).ceil() as u32;
        let mut timer = Timer::new();
        for frame in 0..frames {
            self.scene.advance(FRAME_TIME)?;
            timer.update();
            self.scene.events_mut().dispatch();

            // One snapshot a second is enough to see the boxes settle
            if frame % 60 == 0 {
                self.visualizer.clear();
                self.scene.debug_draw(&mut self.visualizer);
                log::debug!("Frame {frame}: {} debug shapes", self.visualizer.shapes().len());
            }
            self.visualizer.update(FRAME_TIME);
        }
        log::info!(
            "Simulated {seconds:.1}s in {:.3}s wall time over {} frames",
            timer.total_time(),
            timer.frame_count()
        );
        Ok(())
    }

    fn report(&self) {
        let stats = self.scene.stats();
        log::info!(
            "{} frames, {} ticks ({} dropped), {} contacts entered, {} exited, {} events handled",
            stats.frames,
            stats.ticks,
            stats.dropped_frames,
            stats.contacts_entered,
            stats.contacts_exited,
            self.handled.get()
        );

        let world = self.scene.world();
        let grounded = self
            .crates
            .iter()
            .filter(|entity| {
                world
                    .get_component::<PhysicsBody>(**entity)
                    .is_some_and(|body| body.is_grounded)
            })
            .count();
        log::info!("{grounded}/{} crates resting on something", self.crates.len());
    }
}

fn main() -> Result<(), SandboxError> {
    arcade_physics::foundation::logging::init("info");

    log::info!("Starting collision sandbox");

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let seconds = match args.next() {
        Some(text) => text.parse::<f32>().map_err(|_| SandboxError::Duration(text))?,
        None => DEFAULT_SECONDS,
    };

    let mut sandbox = Sandbox::new(config_path.as_deref())?;
    sandbox.initialize()?;
    sandbox.run(seconds)?;
    sandbox.report();

    log::info!("Collision sandbox finished");
    Ok(())
}
