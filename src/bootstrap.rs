//! Bootstrap - the single place infrastructure is bound into handlers.

use crate::bus::{Handlers, MessageBus};
use crate::config::BusConfig;
use crate::inject::{Dependencies, DependencyError};
use crate::unit_of_work::{UnitOfWork, Uow};

/// Build a bus over `uow` with default configuration.
///
/// Every handler that declares [`Uow`] receives a handle to this same unit
/// of work.
pub fn create_message_bus<U: UnitOfWork>(
    uow: U,
    handlers: &Handlers,
) -> Result<MessageBus, DependencyError> {
    create_message_bus_with(uow, handlers, Dependencies::new(), BusConfig::default())
}

/// Build a bus over `uow`, with extra dependencies and configuration.
///
/// The unit of work is registered on top of `dependencies`, replacing any
/// `Uow` already present.
pub fn create_message_bus_with<U: UnitOfWork>(
    uow: U,
    handlers: &Handlers,
    mut dependencies: Dependencies,
    config: BusConfig,
) -> Result<MessageBus, DependencyError> {
    let uow = Uow::new(uow);
    dependencies.insert(uow.clone());

    let injected = handlers.inject(&dependencies)?;
    tracing::debug!(
        commands = injected.command_count(),
        event_handlers = injected.event_handler_count(),
        "message bus wired"
    );
    Ok(MessageBus::new(uow, injected, config))
}
