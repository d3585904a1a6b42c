//! Entity - the contract repositories and the unit of work rely on.

use std::fmt;
use std::hash::Hash;

use crate::message::EventQueue;

/// A domain object stored in a repository.
///
/// Entities that raise domain events expose their pending [`EventQueue`];
/// the unit of work drains it after each handled message. Entities without
/// events keep the default `None` accessors.
///
/// ## Example
///
/// ```ignore
/// #[derive(Clone, Debug)]
/// struct Player {
///     id: String,
///     name: String,
///     events: EventQueue,
/// }
///
/// impl Entity for Player {
///     type Id = String;
///
///     fn id(&self) -> &String { &self.id }
///     fn events(&self) -> Option<&EventQueue> { Some(&self.events) }
///     fn events_mut(&mut self) -> Option<&mut EventQueue> { Some(&mut self.events) }
/// }
/// ```
pub trait Entity: Clone + 'static {
    type Id: Clone + Eq + Hash + fmt::Debug + 'static;

    fn id(&self) -> &Self::Id;

    fn events(&self) -> Option<&EventQueue> {
        None
    }

    fn events_mut(&mut self) -> Option<&mut EventQueue> {
        None
    }

    /// Whether the entity has events waiting to be collected.
    fn has_pending_events(&self) -> bool {
        self.events().is_some_and(|events| !events.is_empty())
    }
}
