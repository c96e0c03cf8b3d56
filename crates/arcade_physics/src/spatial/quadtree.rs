//! Quad-tree spatial partitioning structure
//!
//! Divides 2D space into hierarchical quadrants for broad-phase queries.
//! Items live in an arena and nodes hold arena keys, so an item that is
//! duplicated into several quadrants is still one payload and results can
//! be deduplicated by key.

use super::{Rect, SpatialError};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::HashSet;

slotmap::new_key_type! {
    /// Handle to an item stored in a [`QuadTree`]
    pub struct ItemKey;
}

/// How an item that does not fit a single quadrant is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoragePolicy {
    /// Duplicate the item into every child quadrant it overlaps
    #[default]
    Overlap,
    /// Push the item into the one child that fully contains it, otherwise keep it at the parent
    ParentFallback,
}

/// Configuration for quad-tree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// Items a node holds before it subdivides
    pub max_items: usize,

    /// Maximum subdivision depth; nodes at this depth never subdivide
    pub max_depth: u32,

    /// Storage policy for items straddling quadrant boundaries
    pub policy: StoragePolicy,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_items: 4,
            max_depth: 8,
            policy: StoragePolicy::Overlap,
        }
    }
}

/// An item returned from a query
#[derive(Debug, Clone, Copy)]
pub struct QuadItem<'a, T> {
    /// Arena key, stable until the item is removed
    pub key: ItemKey,
    /// Bounds the item was inserted with
    pub bounds: Rect,
    /// Stored payload
    pub payload: &'a T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    bounds: Rect,
    payload: T,
}

type Arena<T> = SlotMap<ItemKey, Entry<T>>;

/// Single node in the quad-tree hierarchy
#[derive(Debug, Clone)]
struct QuadNode {
    bounds: Rect,
    depth: u32,
    items: Vec<ItemKey>,
    /// Quadrants ordered left to right, top to bottom
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Descend through existing children while one fully contains `rect`, then store
    fn insert_deepest<T>(&mut self, key: ItemKey, rect: &Rect, arena: &Arena<T>, config: &QuadTreeConfig) -> usize {
        if let Some(children) = self.children.as_mut() {
            if let Some(child) = children.iter_mut().find(|child| child.bounds.fully_contains(rect)) {
                return child.insert_deepest(key, rect, arena, config);
            }
        }
        self.store(key, rect, arena, config)
    }

    /// Store an item in this node or its children, returning how many nodes took it
    fn store<T>(&mut self, key: ItemKey, rect: &Rect, arena: &Arena<T>, config: &QuadTreeConfig) -> usize {
        if !self.bounds.overlaps(rect) {
            return 0;
        }

        if (self.is_leaf() && self.items.len() < config.max_items) || self.depth >= config.max_depth {
            self.items.push(key);
            return 1;
        }

        if self.is_leaf() {
            self.subdivide(arena, config);
        }

        match self.offer_to_children(key, rect, arena, config) {
            0 => {
                // Overflow stays here
                self.items.push(key);
                1
            }
            stored => stored,
        }
    }

    fn offer_to_children<T>(&mut self, key: ItemKey, rect: &Rect, arena: &Arena<T>, config: &QuadTreeConfig) -> usize {
        let Some(children) = self.children.as_mut() else {
            return 0;
        };

        match config.policy {
            StoragePolicy::Overlap => children
                .iter_mut()
                .map(|child| child.store(key, rect, arena, config))
                .sum(),
            StoragePolicy::ParentFallback => children
                .iter_mut()
                .find(|child| child.bounds.fully_contains(rect))
                .map_or(0, |child| child.store(key, rect, arena, config)),
        }
    }

    /// Split into 4 equal quadrants and push local items down where they are accepted
    fn subdivide<T>(&mut self, arena: &Arena<T>, config: &QuadTreeConfig) {
        if self.children.is_some() {
            return;
        }

        let half_w = self.bounds.width * 0.5;
        let half_h = self.bounds.height * 0.5;
        let left = self.bounds.left();
        let top = self.bounds.top();
        let depth = self.depth + 1;
        let quadrant = |col: f32, row: f32| {
            QuadNode::new(
                Rect::new(
                    left + half_w * (col + 0.5),
                    top + half_h * (row + 0.5),
                    half_w,
                    half_h,
                ),
                depth,
            )
        };

        self.children = Some(Box::new([
            quadrant(0.0, 0.0),
            quadrant(1.0, 0.0),
            quadrant(0.0, 1.0),
            quadrant(1.0, 1.0),
        ]));
        log::trace!("Subdivided quad node at depth {} ({:?})", self.depth, self.bounds);

        let local = std::mem::take(&mut self.items);
        for key in local {
            let Some(entry) = arena.get(key) else {
                continue;
            };
            if self.offer_to_children(key, &entry.bounds, arena, config) == 0 {
                self.items.push(key);
            }
        }
    }

    fn collect_in_bounds<T>(&self, query: &Rect, arena: &Arena<T>, out: &mut Vec<ItemKey>) {
        if !self.bounds.overlaps(query) {
            return;
        }

        out.extend(
            self.items
                .iter()
                .copied()
                .filter(|key| arena.get(*key).is_some_and(|entry| entry.bounds.overlaps(query))),
        );

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_in_bounds(query, arena, out);
            }
        }
    }

    fn collect_all(&self, include_children: bool, out: &mut Vec<ItemKey>) {
        out.extend_from_slice(&self.items);
        if !include_children {
            return;
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_all(true, out);
            }
        }
    }

    fn remove_key(&mut self, key: ItemKey) {
        self.items.retain(|k| *k != key);
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.remove_key(key);
            }
        }
    }

    fn deepest_containing(&self, rect: &Rect) -> &Self {
        self.children
            .as_ref()
            .and_then(|children| children.iter().find(|child| child.bounds.fully_contains(rect)))
            .map_or(self, |child| child.deepest_containing(rect))
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(Self::node_count).sum())
    }

    fn max_depth(&self) -> u32 {
        self.children
            .as_ref()
            .map_or(self.depth, |children| children.iter().map(Self::max_depth).max().unwrap_or(self.depth))
    }
}

/// Quad-tree over `(Rect, T)` items
///
/// The bounds are fixed at construction. Retrieval may return the same item
/// more than once under [`StoragePolicy::Overlap`]; use [`QuadTree::query_unique`]
/// when duplicates matter.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    root: QuadNode,
    items: Arena<T>,
    config: QuadTreeConfig,
}

impl<T> QuadTree<T> {
    /// Create an empty tree covering `bounds`
    pub fn new(bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            root: QuadNode::new(bounds, 0),
            items: SlotMap::with_key(),
            config,
        }
    }

    /// Bounds fixed at construction
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Active configuration
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Insert an item into the deepest node that fully contains it
    ///
    /// An item that overlaps the tree but is not fully inside it is kept
    /// at the root.
    pub fn insert(&mut self, bounds: Rect, payload: T) -> Result<ItemKey, SpatialError> {
        if !self.root.bounds.overlaps(&bounds) {
            return Err(SpatialError::OutOfBounds { bounds });
        }

        let key = self.items.insert(Entry { bounds, payload });
        if self.root.bounds.fully_contains(&bounds) {
            self.root.insert_deepest(key, &bounds, &self.items, &self.config);
        } else {
            log::warn!(
                "Item {:?} is not fully inside quad-tree bounds {:?}; storing at root",
                bounds,
                self.root.bounds
            );
            self.root.store(key, &bounds, &self.items, &self.config);
        }
        Ok(key)
    }

    /// Bounds of the deepest existing node that fully contains `rect`
    pub fn deepest_containing_node(&self, rect: &Rect) -> Rect {
        self.root.deepest_containing(rect).bounds
    }

    /// Items whose bounds overlap `query`, possibly with duplicates
    pub fn retrieve_in_bounds(&self, query: &Rect) -> Vec<QuadItem<'_, T>> {
        let mut keys = Vec::new();
        self.root.collect_in_bounds(query, &self.items, &mut keys);
        self.resolve(keys)
    }

    /// Items whose bounds overlap `query`, each reported once in first-seen order
    pub fn query_unique(&self, query: &Rect) -> Vec<QuadItem<'_, T>> {
        let mut keys = Vec::new();
        self.root.collect_in_bounds(query, &self.items, &mut keys);
        let mut seen = HashSet::with_capacity(keys.len());
        keys.retain(|key| seen.insert(*key));
        self.resolve(keys)
    }

    /// Every stored reference, from the root only or from the whole tree
    pub fn retrieve_all(&self, include_children: bool) -> Vec<QuadItem<'_, T>> {
        let mut keys = Vec::new();
        self.root.collect_all(include_children, &mut keys);
        self.resolve(keys)
    }

    /// Look up one item by key
    pub fn get(&self, key: ItemKey) -> Option<QuadItem<'_, T>> {
        self.items.get(key).map(|entry| QuadItem {
            key,
            bounds: entry.bounds,
            payload: &entry.payload,
        })
    }

    /// Remove an item from every node that references it
    pub fn remove(&mut self, key: ItemKey) -> bool {
        if self.items.remove(key).is_none() {
            return false;
        }
        self.root.remove_key(key);
        true
    }

    /// Remove every item carrying `payload`, returning how many were removed
    pub fn remove_payload(&mut self, payload: &T) -> usize
    where
        T: PartialEq,
    {
        let keys: Vec<ItemKey> = self
            .items
            .iter()
            .filter(|(_, entry)| entry.payload == *payload)
            .map(|(key, _)| key)
            .collect();
        keys.into_iter().filter(|key| self.remove(*key)).count()
    }

    /// Drop every item and collapse the tree to its root
    pub fn clear(&mut self) {
        self.items.clear();
        self.root = QuadNode::new(self.root.bounds, 0);
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Depth of the deepest node (root is 0)
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    fn resolve(&self, keys: Vec<ItemKey>) -> Vec<QuadItem<'_, T>> {
        keys.into_iter().filter_map(|key| self.get(key)).collect()
    }
}
