//! InMemoryRepository - HashMap-backed repository for the RAM unit of work.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use super::Repository;
use crate::entity::Entity;
use crate::message::{Event, EventQueue};

/// In-memory repository keyed by entity id.
///
/// Entities are stored behind `Rc` and copied on first write, so cloning the
/// repository (which is what a unit of work snapshot does) shares every
/// entity that was not touched since.
///
/// Every entity passing through `add`, `get`, `get_mut` or `find_one` is
/// recorded in the seen list, in first-encounter order.
#[derive(Clone)]
pub struct InMemoryRepository<E: Entity> {
    entities: HashMap<E::Id, Rc<E>>,
    seen: Vec<E::Id>,
    seen_ids: HashSet<E::Id>,
    /// Leading entries of `seen` whose queues are known to be empty.
    drained: usize,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        InMemoryRepository {
            entities: HashMap::new(),
            seen: Vec::new(),
            seen_ids: HashSet::new(),
            drained: 0,
        }
    }

    /// Insert an entity, replacing any entity with the same id.
    pub fn add(&mut self, entity: E) {
        let id = entity.id().clone();
        self.mark_seen(&id);
        self.drained = 0;
        self.entities.insert(id, Rc::new(entity));
    }

    pub fn get<Q>(&mut self, id: &Q) -> Option<&E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = self.entities.get_key_value(id)?.0.clone();
        self.mark_seen(&key);
        self.entities.get(id).map(|entity| &**entity)
    }

    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let key = self.entities.get_key_value(id)?.0.clone();
        self.mark_seen(&key);
        self.drained = 0;
        self.entities.get_mut(id).map(Rc::make_mut)
    }

    /// Remove an entity and hand it back, pending events included.
    pub fn delete<Q>(&mut self, id: &Q) -> Option<E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entities
            .remove(id)
            .map(|entity| Rc::try_unwrap(entity).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Any entity matching the predicate.
    pub fn find_one<F>(&mut self, predicate: F) -> Option<&E>
    where
        F: Fn(&E) -> bool,
    {
        let key = self
            .entities
            .iter()
            .find(|(_, entity)| predicate(entity))
            .map(|(id, _)| id.clone())?;
        self.mark_seen(&key);
        self.entities.get(&key).map(|entity| &**entity)
    }

    /// Whether an entity exists. Does not count as seeing it.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids of every entity seen so far, in first-encounter order.
    pub fn seen(&self) -> &[E::Id] {
        &self.seen
    }

    /// Iterate stored entities without marking them seen.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.values().map(|entity| &**entity)
    }

    fn mark_seen(&mut self, id: &E::Id) {
        if self.seen_ids.insert(id.clone()) {
            self.seen.push(id.clone());
        }
    }
}

impl<E: Entity> fmt::Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("entities", &self.entities.len())
            .field("seen", &self.seen)
            .finish()
    }
}

impl<E: Entity> Repository for InMemoryRepository<E> {
    fn pop_pending_event(&mut self) -> Option<Box<dyn Event>> {
        while let Some(id) = self.seen.get(self.drained) {
            if let Some(entity) = self.entities.get_mut(id) {
                if entity.has_pending_events() {
                    return Rc::make_mut(entity).events_mut().and_then(EventQueue::pop);
                }
            }
            self.drained += 1;
        }
        None
    }

    fn discard_pending_events(&mut self) {
        for id in &self.seen {
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            if entity.has_pending_events() {
                if let Some(events) = Rc::make_mut(entity).events_mut() {
                    events.clear();
                }
            }
        }
        self.drained = self.seen.len();
    }
}
