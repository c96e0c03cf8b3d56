//! Collision messaging
//!
//! - Messages are addressed: a sender entity, a receiver entity, and an event
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify handlers interested in a kind)
//! - The collision system only sees the [`MessageSink`] trait, so tests can
//!   collect messages in a plain `Vec`

use crate::ecs::Entity;
use crate::physics::ContactManifold;
use std::collections::HashMap;

/// Phase of a contact's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// First tick the pair overlaps
    Enter,
    /// Pair was already overlapping last tick
    Stay,
    /// Pair stopped overlapping
    Exit,
}

/// Contact list an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactCategory {
    /// Dynamic body against static solid geometry
    Collider,
    /// Dynamic body inside a static trigger
    Trigger,
    /// Two dynamic bodies
    Dynamic,
}

/// Collision event payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Lifetime phase
    pub kind: CollisionEventKind,
    /// Contact list
    pub category: ContactCategory,
    /// Contact geometry; for `Exit` this is the last recorded contact
    pub manifold: ContactManifold,
}

/// Addressed event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    /// Entity on the other side of the contact
    pub sender: Entity,
    /// Entity being notified
    pub receiver: Entity,
    /// The event
    pub event: CollisionEvent,
}

/// Anything that accepts collision messages
pub trait MessageSink {
    /// Deliver one message
    fn send_message(&mut self, sender: Entity, receiver: Entity, event: CollisionEvent);
}

impl MessageSink for Vec<Message> {
    fn send_message(&mut self, sender: Entity, receiver: Entity, event: CollisionEvent) {
        self.push(Message {
            sender,
            receiver,
            event,
        });
    }
}

/// Event handler trait
/// Returns true if the message was consumed (stops forwarding)
pub trait EventHandler {
    /// Handle a message, return true if consumed
    fn on_event(&mut self, message: &Message) -> bool;
}

/// Message queue with per-kind handler registration
pub struct EventSystem {
    immediate_queue: Vec<Message>,
    handlers: HashMap<CollisionEventKind, Vec<Box<dyn EventHandler>>>,
    delivered: u64,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            handlers: HashMap::new(),
            delivered: 0,
        }
    }

    /// Register a handler for one event kind
    pub fn register_handler(&mut self, kind: CollisionEventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue a message for the next dispatch
    pub fn send(&mut self, message: Message) {
        self.immediate_queue.push(message);
    }

    /// Deliver every queued message to the handlers registered for its kind
    pub fn dispatch(&mut self) {
        let immediate = std::mem::take(&mut self.immediate_queue);
        for message in &immediate {
            self.dispatch_message(message);
        }
    }

    fn dispatch_message(&mut self, message: &Message) {
        self.delivered += 1;
        if let Some(handlers) = self.handlers.get_mut(&message.event.kind) {
            for handler in handlers.iter_mut() {
                if handler.on_event(message) {
                    break;
                }
            }
        }
    }

    /// Take the queued messages without dispatching them
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.immediate_queue)
    }

    /// Queued messages
    pub fn pending(&self) -> &[Message] {
        &self.immediate_queue
    }

    /// Messages handed to handlers so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Drop queued messages
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for EventSystem {
    fn send_message(&mut self, sender: Entity, receiver: Entity, event: CollisionEvent) {
        self.send(Message {
            sender,
            receiver,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<Message>>>,
        consume: bool,
    }

    impl EventHandler for Recorder {
        fn on_event(&mut self, message: &Message) -> bool {
            self.seen.borrow_mut().push(*message);
            self.consume
        }
    }

    fn event(kind: CollisionEventKind) -> CollisionEvent {
        let manifold = ContactManifold::between(
            Entity::new(0),
            Rect::new(0.0, 0.0, 2.0, 2.0),
            Entity::new(1),
            Rect::new(1.0, 0.0, 2.0, 2.0),
        )
        .unwrap();
        CollisionEvent {
            kind,
            category: ContactCategory::Collider,
            manifold,
        }
    }

    #[test]
    fn test_dispatch_routes_by_kind() {
        let enters = Rc::new(RefCell::new(Vec::new()));
        let exits = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventSystem::new();
        events.register_handler(
            CollisionEventKind::Enter,
            Box::new(Recorder {
                seen: enters.clone(),
                consume: false,
            }),
        );
        events.register_handler(
            CollisionEventKind::Exit,
            Box::new(Recorder {
                seen: exits.clone(),
                consume: false,
            }),
        );

        events.send_message(Entity::new(1), Entity::new(0), event(CollisionEventKind::Enter));
        events.send_message(Entity::new(1), Entity::new(0), event(CollisionEventKind::Stay));
        assert_eq!(events.pending().len(), 2);

        events.dispatch();
        assert!(events.pending().is_empty());
        assert_eq!(events.delivered(), 2);
        assert_eq!(enters.borrow().len(), 1);
        assert!(exits.borrow().is_empty());
    }

    #[test]
    fn test_consuming_handler_stops_forwarding() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventSystem::new();
        for (seen, consume) in [(first.clone(), true), (second.clone(), false)] {
            events.register_handler(CollisionEventKind::Stay, Box::new(Recorder { seen, consume }));
        }

        events.send_message(Entity::new(0), Entity::new(1), event(CollisionEventKind::Stay));
        events.dispatch();

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_drain_bypasses_handlers() {
        let mut events = EventSystem::new();
        events.send_message(Entity::new(0), Entity::new(1), event(CollisionEventKind::Exit));

        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].receiver, Entity::new(1));
        assert_eq!(events.delivered(), 0);
    }

    #[test]
    fn test_vec_sink_collects_messages() {
        let mut sink: Vec<Message> = Vec::new();
        sink.send_message(Entity::new(3), Entity::new(4), event(CollisionEventKind::Enter));
        assert_eq!(sink[0].sender, Entity::new(3));
    }
}
