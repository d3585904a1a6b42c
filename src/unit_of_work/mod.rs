//! Unit of Work - transactional scope over named repositories.
//!
//! A unit of work owns an ordered set of [`Repositories`]. Handlers mutate
//! entities through it, then either `commit` or leave the scope, which always
//! rolls back to the last commit. After each handled message the bus drains
//! [`UnitOfWork::collect_new_events`] to find the events entities raised.
//!
//! ## Example
//!
//! ```ignore
//! let uow = Uow::new(RamUnitOfWork::new(
//!     Repositories::new().with("objects", InMemoryRepository::<SampleObject>::new()),
//! ));
//!
//! uow.scoped(|uow| {
//!     uow.repository_mut::<InMemoryRepository<SampleObject>>("objects")?
//!         .add(SampleObject::new("123", "test"));
//!     uow.commit()
//! })?;
//! ```

mod error;
mod handle;
mod new_events;
mod ram;
mod repositories;
mod unit_of_work;

pub use error::UowError;
pub use handle::Uow;
pub use new_events::NewEvents;
pub use ram::RamUnitOfWork;
pub use repositories::Repositories;
pub use unit_of_work::{UnitOfWork, UnitOfWorkExt, UowScope};
