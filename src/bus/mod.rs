//! Message bus - routes commands and events to their handlers.
//!
//! Handlers are registered on [`Handlers`], bound to their dependencies with
//! [`Handlers::inject`], and driven by a [`MessageBus`]. Most callers build
//! the bus through [`create_message_bus`](crate::create_message_bus).

mod error;
mod handlers;
mod message_bus;

pub use error::{BusError, HandlerError};
pub use handlers::{Handlers, InjectedHandlers};
pub use message_bus::MessageBus;
