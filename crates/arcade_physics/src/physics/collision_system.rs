//! Core collision detection system
//!
//! Broad phase: static colliders and static triggers live in two quad-trees
//! rebuilt whenever the static sets change; dynamic bodies are scanned
//! linearly. Narrow phase: exact AABB overlap producing a
//! [`ContactManifold`]. After every body has been processed,
//! [`CollisionSystem::post_update`] pushes bodies out of static geometry and
//! diffs this tick's contacts against the previous ones to emit
//! Enter/Stay/Exit messages.

use super::{CollisionError, ContactManifold, PairKey};
use crate::config::{Config, ConfigError};
use crate::debug::CollisionDebugVisualizer;
use crate::ecs::components::{BoxCollider, ColliderCategory, PhysicsBody, WorldPosition};
use crate::ecs::{Entity, World};
use crate::events::{CollisionEvent, CollisionEventKind, ContactCategory, MessageSink};
use crate::foundation::math::Vec2;
use crate::physics::LayerMask;
use crate::spatial::{QuadTree, QuadTreeConfig, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Positional correction applied to bodies overlapping static colliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepenetrationConfig {
    /// Fraction of the penetration corrected per tick
    pub scale: f32,

    /// Overlap left in place so resting contacts stay in contact
    pub skin: f32,

    /// Divisor applied after scaling
    pub divisor: f32,
}

impl Default for DepenetrationConfig {
    fn default() -> Self {
        Self {
            scale: 0.92,
            skin: 0.01,
            divisor: 0.95,
        }
    }
}

impl DepenetrationConfig {
    /// Distance to move a body that overlaps by `penetration`
    pub fn correction(&self, penetration: f32) -> f32 {
        self.scale * (penetration - self.skin).max(0.0) / self.divisor
    }
}

/// Collision system configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// World gravity; contacts whose normal points along it ground the body
    pub gravity: Vec2,

    /// Margin added around the static set when sizing the trees
    pub tree_padding: f32,

    /// Depenetration tuning
    pub depenetration: DepenetrationConfig,

    /// Quad-tree tuning for both static trees
    pub quadtree: QuadTreeConfig,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
            tree_padding: 1.0,
            depenetration: DepenetrationConfig::default(),
            quadtree: QuadTreeConfig::default(),
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Reject values the system cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depenetration.divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "depenetration.divisor",
                reason: format!("must be positive, got {}", self.depenetration.divisor),
            });
        }
        if self.depenetration.skin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "depenetration.skin",
                reason: format!("must not be negative, got {}", self.depenetration.skin),
            });
        }
        if self.quadtree.max_items == 0 {
            return Err(ConfigError::Invalid {
                field: "quadtree.max_items",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tree_padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "tree_padding",
                reason: format!("must not be negative, got {}", self.tree_padding),
            });
        }
        Ok(())
    }
}

/// Event counts produced by one history diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCounts {
    /// New contacts
    pub entered: usize,
    /// Continuing contacts
    pub stayed: usize,
    /// Ended contacts
    pub exited: usize,
}

/// Summary of one [`CollisionSystem::post_update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    /// Body against static collider
    pub collider: HistoryCounts,
    /// Body inside static trigger
    pub trigger: HistoryCounts,
    /// Body against body
    pub dynamic: HistoryCounts,
    /// Collider contacts that moved their body
    pub depenetrated: usize,
}

/// Diff this tick's contacts against `history`, notifying both sides of every pair
///
/// A pair missing from `history` enters and is recorded; a recorded pair
/// stays and keeps its original entry. Recorded pairs absent this tick exit
/// and are evicted, in ascending pair order.
pub fn resolve_history_events(
    current: &[ContactManifold],
    history: &mut HashMap<PairKey, ContactManifold>,
    category: ContactCategory,
    sink: &mut dyn MessageSink,
) -> HistoryCounts {
    let mut counts = HistoryCounts::default();
    let mut touched = HashSet::with_capacity(current.len());

    for manifold in current {
        let key = manifold.pair_key();
        touched.insert(key);
        let kind = if history.contains_key(&key) {
            counts.stayed += 1;
            CollisionEventKind::Stay
        } else {
            history.insert(key, *manifold);
            counts.entered += 1;
            CollisionEventKind::Enter
        };
        notify_pair(sink, kind, category, manifold);
    }

    let mut ended: Vec<PairKey> = history.keys().filter(|key| !touched.contains(key)).copied().collect();
    ended.sort_unstable();
    for key in ended {
        if let Some(manifold) = history.remove(&key) {
            counts.exited += 1;
            notify_pair(sink, CollisionEventKind::Exit, category, &manifold);
        }
    }

    counts
}

fn notify_pair(
    sink: &mut dyn MessageSink,
    kind: CollisionEventKind,
    category: ContactCategory,
    manifold: &ContactManifold,
) {
    let event = CollisionEvent {
        kind,
        category,
        manifold: *manifold,
    };
    sink.send_message(manifold.col_b, manifold.col_a, event);
    sink.send_message(manifold.col_a, manifold.col_b, event);
}

/// Keep the first manifold of every unordered pair
fn dedup_pairs(contacts: &mut Vec<ContactManifold>) {
    let mut seen = HashSet::with_capacity(contacts.len());
    contacts.retain(|manifold| seen.insert(manifold.pair_key()));
}

fn collider_rect(world: &World, entity: Entity) -> Result<(Rect, LayerMask), CollisionError> {
    let position = world
        .get_component::<WorldPosition>(entity)
        .ok_or(CollisionError::MissingComponent {
            entity,
            component: "WorldPosition",
        })?;
    let collider = world
        .get_component::<BoxCollider>(entity)
        .ok_or(CollisionError::MissingComponent {
            entity,
            component: "BoxCollider",
        })?;
    Ok((collider.world_rect(position), collider.layer_mask))
}

fn build_tree(
    world: &World,
    entities: &BTreeSet<Entity>,
    config: &CollisionConfig,
) -> Result<QuadTree<Entity>, CollisionError> {
    let mut rects = Vec::with_capacity(entities.len());
    for entity in entities {
        let (rect, _) = collider_rect(world, *entity)?;
        rects.push((*entity, rect));
    }

    let Some((_, first)) = rects.first() else {
        return Ok(QuadTree::new(Rect::default(), config.quadtree));
    };
    let mut bounds = *first;
    for (_, rect) in &rects[1..] {
        bounds.encapsulate(rect);
    }
    bounds.expand_size(config.tree_padding * 2.0, config.tree_padding * 2.0);

    let mut tree = QuadTree::new(bounds, config.quadtree);
    for (entity, rect) in rects {
        tree.insert(rect, entity)?;
    }
    Ok(tree)
}

/// 2D collision system for box colliders
///
/// Owns the three collider registries, the two static quad-trees and the
/// per-category contact histories. A tick is `process_entity` for every
/// collider followed by one `post_update`; [`CollisionSystem::fixed_update`]
/// does both.
pub struct CollisionSystem {
    config: CollisionConfig,

    static_colliders: BTreeSet<Entity>,
    static_triggers: BTreeSet<Entity>,
    dynamic_objects: BTreeSet<Entity>,

    collider_tree: QuadTree<Entity>,
    trigger_tree: QuadTree<Entity>,
    tree_dirty: bool,

    collider_contacts: Vec<ContactManifold>,
    trigger_contacts: Vec<ContactManifold>,
    dynamic_contacts: Vec<ContactManifold>,

    collider_history: HashMap<PairKey, ContactManifold>,
    trigger_history: HashMap<PairKey, ContactManifold>,
    dynamic_history: HashMap<PairKey, ContactManifold>,
}

impl CollisionSystem {
    /// Create an empty collision system
    ///
    /// Fails when `config` does not pass [`CollisionConfig::validate`].
    pub fn new(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_validated_config(config))
    }

    /// Empty collision system for a config that already passed validation
    fn with_validated_config(config: CollisionConfig) -> Self {
        Self {
            config,
            static_colliders: BTreeSet::new(),
            static_triggers: BTreeSet::new(),
            dynamic_objects: BTreeSet::new(),
            collider_tree: QuadTree::new(Rect::default(), config.quadtree),
            trigger_tree: QuadTree::new(Rect::default(), config.quadtree),
            tree_dirty: false,
            collider_contacts: Vec::new(),
            trigger_contacts: Vec::new(),
            dynamic_contacts: Vec::new(),
            collider_history: HashMap::new(),
            trigger_history: HashMap::new(),
            dynamic_history: HashMap::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Add an entity to the registry matching its collider flags
    ///
    /// Registering again moves the entity to its current category. Static
    /// registrations mark the trees for rebuild on the next tick.
    pub fn register(&mut self, world: &World, entity: Entity) -> Result<ColliderCategory, CollisionError> {
        if !world.has_component::<WorldPosition>(entity) {
            return Err(CollisionError::MissingComponent {
                entity,
                component: "WorldPosition",
            });
        }
        let category = world
            .get_component::<BoxCollider>(entity)
            .ok_or(CollisionError::MissingComponent {
                entity,
                component: "BoxCollider",
            })?
            .category();

        if let Some(previous) = self.remove_from_sets(entity) {
            if previous != category {
                log::debug!("Entity {} moved from {:?} to {:?}", entity, previous, category);
            }
        }

        match category {
            ColliderCategory::StaticCollider => {
                self.static_colliders.insert(entity);
            }
            ColliderCategory::StaticTrigger => {
                self.static_triggers.insert(entity);
            }
            ColliderCategory::Dynamic => {
                self.dynamic_objects.insert(entity);
            }
        }
        if category.is_static() {
            self.tree_dirty = true;
        }

        log::debug!("Registered {} as {:?}", entity, category);
        Ok(category)
    }

    /// Remove an entity from whichever registry holds it
    ///
    /// Recorded contacts are kept, so the next tick reports their exit.
    pub fn unregister(&mut self, entity: Entity) -> Result<ColliderCategory, CollisionError> {
        let category = self
            .remove_from_sets(entity)
            .ok_or(CollisionError::NotRegistered(entity))?;
        log::debug!("Unregistered {} from {:?}", entity, category);
        Ok(category)
    }

    fn remove_from_sets(&mut self, entity: Entity) -> Option<ColliderCategory> {
        if self.static_colliders.remove(&entity) {
            self.tree_dirty = true;
            Some(ColliderCategory::StaticCollider)
        } else if self.static_triggers.remove(&entity) {
            self.tree_dirty = true;
            Some(ColliderCategory::StaticTrigger)
        } else if self.dynamic_objects.remove(&entity) {
            Some(ColliderCategory::Dynamic)
        } else {
            None
        }
    }

    /// Drop registrations whose entity no longer exists in `world`
    ///
    /// Their recorded contacts report `Exit` on the next resolve.
    pub fn evict_destroyed(&mut self, world: &World) -> usize {
        let stale: Vec<Entity> = self
            .static_colliders
            .iter()
            .chain(&self.static_triggers)
            .chain(&self.dynamic_objects)
            .copied()
            .filter(|entity| !world.contains(*entity))
            .collect();
        for entity in &stale {
            if let Some(category) = self.remove_from_sets(*entity) {
                log::debug!("Evicted destroyed {} from {:?}", entity, category);
            }
        }
        stale.len()
    }

    /// Rebuild both static quad-trees from the current registries
    pub fn rebuild_spatial_tree(&mut self, world: &World) -> Result<(), CollisionError> {
        self.collider_tree = build_tree(world, &self.static_colliders, &self.config)?;
        self.trigger_tree = build_tree(world, &self.static_triggers, &self.config)?;
        self.tree_dirty = false;

        log::debug!(
            "Rebuilt spatial trees: {} colliders in {} nodes, {} triggers in {} nodes",
            self.collider_tree.len(),
            self.collider_tree.node_count(),
            self.trigger_tree.len(),
            self.trigger_tree.node_count()
        );
        Ok(())
    }

    /// Change a live collider's flags and move it to the matching registry
    ///
    /// The trees are rebuilt immediately when a static set changed.
    pub fn set_collider_flags(
        &mut self,
        world: &mut World,
        entity: Entity,
        is_static: bool,
        is_trigger: bool,
    ) -> Result<ColliderCategory, CollisionError> {
        let collider = world
            .get_component_mut::<BoxCollider>(entity)
            .ok_or(CollisionError::MissingComponent {
                entity,
                component: "BoxCollider",
            })?;
        let previous = collider.category();
        collider.is_static = is_static;
        collider.is_trigger = is_trigger;
        let category = collider.category();

        self.register(world, entity)?;

        if previous.is_static() || category.is_static() {
            self.rebuild_spatial_tree(world)?;
        }
        Ok(category)
    }

    /// Gather this tick's contacts for one dynamic body
    ///
    /// Entities that are not registered as dynamic are skipped. Bodies whose
    /// contact normal points along gravity are marked grounded.
    pub fn process_entity(&mut self, world: &mut World, entity: Entity) -> Result<(), CollisionError> {
        if !self.dynamic_objects.contains(&entity) {
            return Ok(());
        }
        let (rect, mask) = collider_rect(world, entity)?;

        let candidates: Vec<Entity> = self
            .collider_tree
            .query_unique(&rect)
            .iter()
            .map(|item| *item.payload)
            .collect();
        let contacts = Self::contacts_against(world, entity, rect, mask, &candidates);
        self.ground_on(world, entity, &contacts);
        self.collider_contacts.extend(contacts);

        let candidates: Vec<Entity> = self
            .trigger_tree
            .query_unique(&rect)
            .iter()
            .map(|item| *item.payload)
            .collect();
        let contacts = Self::contacts_against(world, entity, rect, mask, &candidates);
        self.trigger_contacts.extend(contacts);

        let candidates: Vec<Entity> = self.dynamic_objects.iter().copied().filter(|other| *other != entity).collect();
        let contacts = Self::contacts_against(world, entity, rect, mask, &candidates);
        self.ground_on(world, entity, &contacts);
        self.dynamic_contacts.extend(contacts);

        Ok(())
    }

    fn contacts_against(
        world: &World,
        entity: Entity,
        rect: Rect,
        mask: LayerMask,
        candidates: &[Entity],
    ) -> Vec<ContactManifold> {
        let mut contacts = Vec::new();
        for other in candidates.iter().copied().filter(|other| *other != entity) {
            let Ok((other_rect, other_mask)) = collider_rect(world, other) else {
                log::warn!("Skipping {}: registered collider is missing components", other);
                continue;
            };
            if !mask.interacts(other_mask) || !rect.overlaps(&other_rect) {
                continue;
            }
            if let Some(manifold) = ContactManifold::between(entity, rect, other, other_rect) {
                contacts.push(manifold);
            }
        }
        contacts
    }

    fn ground_on(&self, world: &mut World, entity: Entity, contacts: &[ContactManifold]) {
        if !contacts.iter().any(|m| m.normal.dot(&self.config.gravity) > 0.0) {
            return;
        }
        if let Some(body) = world.get_component_mut::<PhysicsBody>(entity) {
            body.is_grounded = true;
        }
    }

    /// Resolve collider contacts and emit this tick's events
    ///
    /// The current contact lists are consumed even when an error is
    /// returned.
    pub fn post_update(
        &mut self,
        world: &mut World,
        sink: &mut dyn MessageSink,
    ) -> Result<ContactReport, CollisionError> {
        let mut colliders = std::mem::take(&mut self.collider_contacts);
        let mut triggers = std::mem::take(&mut self.trigger_contacts);
        let mut dynamics = std::mem::take(&mut self.dynamic_contacts);
        dedup_pairs(&mut colliders);
        dedup_pairs(&mut triggers);
        dedup_pairs(&mut dynamics);

        let mut report = ContactReport::default();
        for manifold in &colliders {
            if self.depenetrate(world, manifold)? {
                report.depenetrated += 1;
            }
        }

        report.collider = resolve_history_events(
            &colliders,
            &mut self.collider_history,
            ContactCategory::Collider,
            sink,
        );
        report.trigger = resolve_history_events(
            &triggers,
            &mut self.trigger_history,
            ContactCategory::Trigger,
            sink,
        );
        report.dynamic = resolve_history_events(
            &dynamics,
            &mut self.dynamic_history,
            ContactCategory::Dynamic,
            sink,
        );

        log::trace!("Post update: {:?}", report);
        Ok(report)
    }

    /// Push `col_a` out of `col_b` and cancel its velocity into the contact
    ///
    /// The overlap is measured again from A's current position, so a body
    /// resting on several touching tiles is not pushed once per tile.
    fn depenetrate(&self, world: &mut World, manifold: &ContactManifold) -> Result<bool, CollisionError> {
        let entity = manifold.col_a;
        if !world.has_component::<PhysicsBody>(entity) {
            return Err(CollisionError::MissingComponent {
                entity,
                component: "PhysicsBody",
            });
        }
        let (rect, _) = collider_rect(world, entity)?;

        let axis = manifold.axis();
        let half_extents = rect.half_size() + manifold.rect_b.half_size();
        let distance = axis.component(&(manifold.rect_b.center() - rect.center())).abs();
        let remaining = (axis.component(&half_extents) - distance).min(manifold.penetration);

        let push = self.config.depenetration.correction(remaining);
        if push > 0.0 {
            if let Some(position) = world.get_component_mut::<WorldPosition>(entity) {
                position.translate(-manifold.normal * push);
            }
        }
        if let Some(body) = world.get_component_mut::<PhysicsBody>(entity) {
            body.cancel_velocity_along(manifold.normal);
        }
        Ok(push > 0.0)
    }

    /// One full tick: rebuild stale trees, gather contacts for every collider, resolve
    pub fn fixed_update(
        &mut self,
        world: &mut World,
        sink: &mut dyn MessageSink,
    ) -> Result<ContactReport, CollisionError> {
        self.evict_destroyed(world);
        if self.tree_dirty {
            self.rebuild_spatial_tree(world)?;
        }
        for entity in world.entities_with::<BoxCollider>() {
            if world.has_component::<WorldPosition>(entity) {
                self.process_entity(world, entity)?;
            }
        }
        self.post_update(world, sink)
    }

    /// Draw every registered collider and every recorded contact
    pub fn debug_draw(&self, world: &World, visualizer: &mut CollisionDebugVisualizer) {
        let registries = [
            (&self.static_colliders, ColliderCategory::StaticCollider),
            (&self.static_triggers, ColliderCategory::StaticTrigger),
            (&self.dynamic_objects, ColliderCategory::Dynamic),
        ];
        for (entities, category) in registries {
            for entity in entities {
                let Some(collider) = world.get_component::<BoxCollider>(*entity) else {
                    continue;
                };
                if let Ok((rect, _)) = collider_rect(world, *entity) {
                    visualizer.draw_collider(&rect, category, collider.debug_draw);
                }
            }
        }

        for category in [ContactCategory::Collider, ContactCategory::Trigger, ContactCategory::Dynamic] {
            for manifold in self.contacts(category) {
                visualizer.draw_contact(manifold);
            }
        }
    }

    /// Registry an entity is in
    pub fn category_of(&self, entity: Entity) -> Option<ColliderCategory> {
        if self.static_colliders.contains(&entity) {
            Some(ColliderCategory::StaticCollider)
        } else if self.static_triggers.contains(&entity) {
            Some(ColliderCategory::StaticTrigger)
        } else if self.dynamic_objects.contains(&entity) {
            Some(ColliderCategory::Dynamic)
        } else {
            None
        }
    }

    /// Recorded contacts of one category, in ascending pair order
    pub fn contacts(&self, category: ContactCategory) -> Vec<&ContactManifold> {
        let history = match category {
            ContactCategory::Collider => &self.collider_history,
            ContactCategory::Trigger => &self.trigger_history,
            ContactCategory::Dynamic => &self.dynamic_history,
        };
        let mut contacts: Vec<(&PairKey, &ContactManifold)> = history.iter().collect();
        contacts.sort_unstable_by_key(|(key, _)| **key);
        contacts.into_iter().map(|(_, manifold)| manifold).collect()
    }

    /// Whether two entities are recorded as touching
    pub fn is_touching(&self, a: Entity, b: Entity) -> bool {
        let key = PairKey::new(a, b);
        self.collider_history.contains_key(&key)
            || self.trigger_history.contains_key(&key)
            || self.dynamic_history.contains_key(&key)
    }

    /// Registered static colliders
    pub fn static_collider_count(&self) -> usize {
        self.static_colliders.len()
    }

    /// Registered static triggers
    pub fn static_trigger_count(&self) -> usize {
        self.static_triggers.len()
    }

    /// Registered dynamic bodies
    pub fn dynamic_count(&self) -> usize {
        self.dynamic_objects.len()
    }

    /// Whether a static registry changed since the last rebuild
    pub fn is_tree_dirty(&self) -> bool {
        self.tree_dirty
    }

    /// Quad-tree over static colliders
    pub fn collider_tree(&self) -> &QuadTree<Entity> {
        &self.collider_tree
    }

    /// Quad-tree over static triggers
    pub fn trigger_tree(&self) -> &QuadTree<Entity> {
        &self.trigger_tree
    }

    /// Forget every registration, tree and recorded contact without emitting events
    pub fn clear(&mut self) {
        *self = Self::with_validated_config(self.config);
    }
}
