use std::ops::{Deref, DerefMut};

use super::{NewEvents, Repositories, UowError};
use crate::repository::Repository;

/// A transactional scope over an ordered set of named repositories.
///
/// Backends implement `commit_changes` and `rollback`; `commit` and
/// `collect_new_events` are provided. The trait is object-safe so the bus
/// and handlers can share a `dyn UnitOfWork` without naming the backend.
pub trait UnitOfWork: 'static {
    fn repositories(&self) -> &Repositories;

    fn repositories_mut(&mut self) -> &mut Repositories;

    /// Backend-specific commit: the current state becomes the baseline.
    fn commit_changes(&mut self) -> Result<(), UowError>;

    /// Restore the last committed state.
    fn rollback(&mut self) -> Result<(), UowError>;

    fn commit(&mut self) -> Result<(), UowError> {
        self.commit_changes()
    }

    /// Lazily drain the pending events of every seen entity.
    ///
    /// Repositories are visited in registration order, entities in the order
    /// each repository first saw them, and each entity's queue is emptied
    /// oldest-first before moving on.
    fn collect_new_events(&mut self) -> NewEvents<'_> {
        NewEvents::new(self.repositories_mut())
    }
}

/// Typed repository access and scoped acquisition, for every [`UnitOfWork`]
/// (trait objects included).
pub trait UnitOfWorkExt: UnitOfWork {
    /// Look up a repository by name and concrete type.
    fn repository<R: Repository>(&self, name: &str) -> Result<&R, UowError> {
        self.repositories().get(name)
    }

    fn repository_mut<R: Repository>(&mut self, name: &str) -> Result<&mut R, UowError> {
        self.repositories_mut().get_mut(name)
    }

    /// Enter a scope. Leaving it, by any path, rolls back to the last commit.
    fn begin(&mut self) -> UowScope<'_, Self> {
        UowScope {
            uow: self,
            closed: false,
        }
    }

    /// Run `work` inside a scope.
    ///
    /// An error from `work` is returned unchanged (a rollback failure on that
    /// path is only logged). If `work` succeeds, a rollback failure is the
    /// result.
    fn scoped<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<UowError>,
    {
        let mut scope = self.begin();
        let outcome = work(&mut *scope);
        match outcome {
            Ok(value) => {
                scope.close()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = scope.close() {
                    tracing::error!(error = %rollback, "rollback after failed work");
                }
                Err(err)
            }
        }
    }
}

impl<U: UnitOfWork + ?Sized> UnitOfWorkExt for U {}

/// Guard returned by [`UnitOfWorkExt::begin`].
///
/// Dereferences to the unit of work. Dropping the guard rolls back, so
/// uncommitted changes never outlive the scope, including on early return
/// or panic.
pub struct UowScope<'a, U: UnitOfWork + ?Sized> {
    uow: &'a mut U,
    closed: bool,
}

impl<U: UnitOfWork + ?Sized> UowScope<'_, U> {
    /// Leave the scope now and report the rollback result.
    pub fn close(mut self) -> Result<(), UowError> {
        self.closed = true;
        self.uow.rollback()
    }
}

impl<U: UnitOfWork + ?Sized> Deref for UowScope<'_, U> {
    type Target = U;

    fn deref(&self) -> &U {
        self.uow
    }
}

impl<U: UnitOfWork + ?Sized> DerefMut for UowScope<'_, U> {
    fn deref_mut(&mut self) -> &mut U {
        self.uow
    }
}

impl<U: UnitOfWork + ?Sized> Drop for UowScope<'_, U> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.uow.rollback() {
            tracing::error!(error = %err, "rollback on scope exit failed");
        }
    }
}
