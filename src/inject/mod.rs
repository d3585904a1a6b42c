//! Dependency injection - bind infrastructure into handlers at wiring time.
//!
//! A handler takes the message first and its declared dependencies second.
//! [`inject_command`] and [`inject_event`] resolve the dependencies once and
//! return a callable that only takes the message.
//!
//! ## Example
//!
//! ```ignore
//! fn create_object(command: CreateObject, uow: Uow) -> Result<String, HandlerError> {
//!     uow.scoped(|uow| { /* ... */ uow.commit()?; Ok(command.id) })
//! }
//!
//! let deps = Dependencies::new().with(uow);
//! let handler = inject_command(create_object, &deps)?;
//! let id = handler(CreateObject { id: "1".into() })?;
//! ```

mod dependencies;
mod error;

pub use dependencies::{Dep, Dependencies, FromDependencies};
pub use error::DependencyError;

use crate::bus::HandlerError;
use crate::message::{Command, Event};

/// Resolve a command handler's dependencies and return the message-only form.
pub fn inject_command<C, D, F>(
    handler: F,
    dependencies: &Dependencies,
) -> Result<impl Fn(C) -> Result<C::Output, HandlerError>, DependencyError>
where
    C: Command,
    D: FromDependencies + Clone,
    F: Fn(C, D) -> Result<C::Output, HandlerError>,
{
    let resolved: D = dependencies.resolve()?;
    Ok(move |command: C| handler(command, resolved.clone()))
}

/// Resolve an event handler's dependencies and return the message-only form.
pub fn inject_event<E, D, F>(
    handler: F,
    dependencies: &Dependencies,
) -> Result<impl Fn(&E) -> Result<(), HandlerError>, DependencyError>
where
    E: Event,
    D: FromDependencies + Clone,
    F: Fn(&E, D) -> Result<(), HandlerError>,
{
    let resolved: D = dependencies.resolve()?;
    Ok(move |event: &E| handler(event, resolved.clone()))
}
