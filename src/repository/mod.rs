//! Repositories - named entity collections owned by a unit of work.
//!
//! [`Repository`] is the object-safe contract the unit of work consumes.
//! [`InMemoryRepository`] is the bundled implementation used with
//! [`RamUnitOfWork`](crate::RamUnitOfWork).

mod in_memory;
mod repository;

pub use in_memory::InMemoryRepository;
pub use repository::{Repository, RepositoryObject};
