use std::any::Any;

use crate::message::Event;

/// A collection of entities that a unit of work can own.
///
/// The unit of work only needs two things from a repository: draining the
/// pending events of the entities it has seen, and (through the blanket
/// [`RepositoryObject`] impl) type-erased access and snapshotting. Concrete
/// query methods live on the concrete repository type.
pub trait Repository: RepositoryObject + 'static {
    /// Pop the oldest pending event of the first seen entity that has one.
    ///
    /// Entities are visited in the order they were first seen, so repeated
    /// calls empty one entity's queue before moving on to the next.
    fn pop_pending_event(&mut self) -> Option<Box<dyn Event>>;

    /// Drop every pending event of every seen entity.
    fn discard_pending_events(&mut self) {
        while self.pop_pending_event().is_some() {}
    }
}

/// Type-erased helpers for [`Repository`], implemented for every
/// `Repository + Clone`.
pub trait RepositoryObject {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_repository(&self) -> Box<dyn Repository>;
    fn repository_name(&self) -> &'static str;
}

impl<R> RepositoryObject for R
where
    R: Repository + Clone,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_repository(&self) -> Box<dyn Repository> {
        Box::new(self.clone())
    }

    fn repository_name(&self) -> &'static str {
        std::any::type_name::<R>()
    }
}

impl Clone for Box<dyn Repository> {
    fn clone(&self) -> Self {
        self.clone_repository()
    }
}
