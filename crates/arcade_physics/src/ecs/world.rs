//! ECS World implementation
//!
//! Components are stored per type in a `HashMap<Entity, T>`, and the
//! stores themselves are keyed by `TypeId`. Lookups in the per-tick hot
//! path are a `TypeId` hash plus an entity hash; there is no string-keyed
//! component access anywhere.

use super::{Component, Entity};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased view of one component store
trait ComponentStore: Any {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStore for HashMap<Entity, T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(&entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
pub struct World {
    next_entity_id: u32,
    entities: Vec<Entity>,
    component_storages: HashMap<TypeId, Box<dyn ComponentStore>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            component_storages: HashMap::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        entity
    }

    /// Remove an entity and every component attached to it
    ///
    /// Returns `false` if the entity was not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let Some(index) = self.entities.iter().position(|e| *e == entity) else {
            return false;
        };
        self.entities.remove(index);
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    /// Check whether an entity is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    fn storage<T: Component>(&self) -> Option<&HashMap<Entity, T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<HashMap<Entity, T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut HashMap<Entity, T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<HashMap<Entity, T>>()
    }

    /// Add a component to an entity, returning the component it replaced
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashMap::<Entity, T>::new()));
        storage
            .as_any_mut()
            .downcast_mut::<HashMap<Entity, T>>()
            .and_then(|storage| storage.insert(entity, component))
    }

    /// Remove a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(&entity)
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(&entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(&entity)
    }

    /// Check whether an entity has a component
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// All `(entity, component)` pairs of one type, ordered by entity
    pub fn query<T: Component>(&self) -> Vec<(Entity, &T)> {
        let mut results: Vec<(Entity, &T)> = self
            .storage::<T>()
            .map(|storage| storage.iter().map(|(entity, c)| (*entity, c)).collect())
            .unwrap_or_default();
        results.sort_by_key(|(entity, _)| *entity);
        results
    }

    /// Entities holding a component of type `T`, ordered by entity
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.query::<T>().into_iter().map(|(entity, _)| entity).collect()
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{BoxCollider, PhysicsBody, WorldPosition};
    use crate::foundation::math::Vec2;

    #[test]
    fn test_component_roundtrip() {
        let mut world = World::new();
        let entity = world.create_entity();

        assert!(world.add_component(entity, WorldPosition::new(1.0, 2.0)).is_none());
        assert_eq!(world.get_component::<WorldPosition>(entity).map(|p| p.position), Some(Vec2::new(1.0, 2.0)));
        assert!(!world.has_component::<PhysicsBody>(entity));

        if let Some(position) = world.get_component_mut::<WorldPosition>(entity) {
            position.translate(Vec2::new(1.0, 0.0));
        }
        assert_eq!(world.get_component::<WorldPosition>(entity).map(|p| p.position.x), Some(2.0));

        let replaced = world.add_component(entity, WorldPosition::new(0.0, 0.0));
        assert!(replaced.is_some());
    }

    #[test]
    fn test_query_is_ordered_by_entity() {
        let mut world = World::new();
        let entities: Vec<Entity> = (0..5).map(|_| world.create_entity()).collect();
        for entity in entities.iter().rev() {
            world.add_component(*entity, BoxCollider::new(1.0, 1.0));
        }

        assert_eq!(world.entities_with::<BoxCollider>(), entities);
    }

    #[test]
    fn test_remove_component_leaves_others() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, WorldPosition::new(3.0, 4.0));
        world.add_component(entity, PhysicsBody::default());

        let removed = world.remove_component::<WorldPosition>(entity);
        assert_eq!(removed.map(|p| p.position), Some(Vec2::new(3.0, 4.0)));
        assert!(world.remove_component::<WorldPosition>(entity).is_none());
        assert!(world.has_component::<PhysicsBody>(entity));
        assert!(world.contains(entity));
    }

    #[test]
    fn test_destroy_entity_removes_components() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, WorldPosition::new(0.0, 0.0));
        world.add_component(entity, PhysicsBody::default());

        assert!(world.destroy_entity(entity));
        assert!(!world.contains(entity));
        assert!(world.get_component::<WorldPosition>(entity).is_none());
        assert!(world.get_component::<PhysicsBody>(entity).is_none());
        assert!(!world.destroy_entity(entity));
    }
}
