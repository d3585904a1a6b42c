use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::{UnitOfWork, UnitOfWorkExt, UowError};

/// Shared handle to one unit of work.
///
/// The bus and every injected handler hold clones of the same handle.
/// Borrowing is checked at runtime: a second mutable borrow while one is
/// live fails with [`UowError::InUse`].
#[derive(Clone)]
pub struct Uow {
    inner: Rc<RefCell<dyn UnitOfWork>>,
}

impl Uow {
    pub fn new<U: UnitOfWork>(uow: U) -> Self {
        Uow {
            inner: Rc::new(RefCell::new(uow)),
        }
    }

    pub fn borrow(&self) -> Result<Ref<'_, dyn UnitOfWork>, UowError> {
        self.inner.try_borrow().map_err(|_| UowError::InUse)
    }

    pub fn borrow_mut(&self) -> Result<RefMut<'_, dyn UnitOfWork>, UowError> {
        self.inner.try_borrow_mut().map_err(|_| UowError::InUse)
    }

    /// Borrow the unit of work and run `work` inside a rollback scope.
    ///
    /// See [`UnitOfWorkExt::scoped`].
    pub fn scoped<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, E>,
        E: From<UowError>,
    {
        let mut uow = self.borrow_mut()?;
        uow.scoped(work)
    }

    /// Whether both handles point at the same unit of work.
    pub fn ptr_eq(&self, other: &Uow) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Uow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uow")
            .field("handles", &Rc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
