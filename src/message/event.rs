use std::any::{type_name, Any, TypeId};
use std::collections::VecDeque;
use std::fmt;

/// A fact that already happened, fanned out to zero or more handlers.
///
/// Events must be `Clone`: they sit in entity queues, and entities are
/// snapshotted by the unit of work.
pub trait Event: EventObject + fmt::Debug + Send + 'static {}

/// Type-erased helpers for [`Event`], implemented for every `Event + Clone`.
pub trait EventObject {
    fn message_type(&self) -> TypeId;
    fn event_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn clone_event(&self) -> Box<dyn Event>;
}

impl<E> EventObject for E
where
    E: Event + Clone,
{
    fn message_type(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn event_name(&self) -> &'static str {
        type_name::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        self.clone_event()
    }
}

/// FIFO of events an entity has raised but nobody has collected yet.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Box<dyn Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the tail.
    pub fn push<E: Event>(&mut self, event: E) {
        self.events.push_back(Box::new(event));
    }

    pub fn push_boxed(&mut self, event: Box<dyn Event>) {
        self.events.push_back(event);
    }

    /// Remove and return the oldest pending event.
    pub fn pop(&mut self) -> Option<Box<dyn Event>> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Event> {
        self.events.iter().map(|event| &**event)
    }
}
