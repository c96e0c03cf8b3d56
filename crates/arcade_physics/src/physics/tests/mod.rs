//! Multi-tick collision scenarios driven through a bare `World`

mod config_roundtrip;

use crate::ecs::components::{BoxCollider, PhysicsBody, WorldPosition};
use crate::ecs::{Entity, World};
use crate::events::{CollisionEventKind, Message};
use crate::foundation::math::Vec2;
use crate::physics::CollisionSystem;

/// Create an entity with a collider (and a body when dynamic) and register it
fn spawn(world: &mut World, system: &mut CollisionSystem, position: Vec2, collider: BoxCollider) -> Entity {
    let entity = world.create_entity();
    world.add_component(entity, WorldPosition::from_vec(position));
    if !collider.is_static {
        world.add_component(entity, PhysicsBody::default());
    }
    world.add_component(entity, collider);
    system.register(world, entity).unwrap();
    entity
}

/// Event kinds delivered to `receiver`, in order
fn kinds_for(messages: &[Message], receiver: Entity) -> Vec<CollisionEventKind> {
    messages
        .iter()
        .filter(|message| message.receiver == receiver)
        .map(|message| message.event.kind)
        .collect()
}

fn position_of(world: &World, entity: Entity) -> Vec2 {
    world.get_component::<WorldPosition>(entity).unwrap().position
}
