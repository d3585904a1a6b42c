mod bootstrap;
pub mod bus;
pub mod config;
mod entity;
pub mod inject;
pub mod message;
pub mod repository;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod unit_of_work;

pub use bootstrap::{create_message_bus, create_message_bus_with};
pub use bus::{BusError, HandlerError, Handlers, InjectedHandlers, MessageBus};
pub use crate::config::BusConfig;
pub use entity::Entity;
pub use inject::{inject_command, inject_event, Dep, Dependencies, DependencyError, FromDependencies};
pub use message::{Command, CommandObject, Event, EventObject, EventQueue, Message};
pub use repository::{InMemoryRepository, Repository, RepositoryObject};
pub use unit_of_work::{
    NewEvents, RamUnitOfWork, Repositories, UnitOfWork, UnitOfWorkExt, Uow, UowError, UowScope,
};
