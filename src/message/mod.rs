//! Messages - Commands and Events dispatched through the bus.
//!
//! Commands express an intent and are routed to exactly one handler, whose
//! result goes back to the caller. Events record a fact and fan out to zero or
//! more handlers whose results are discarded.
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Debug)]
//! struct CreateObject { id: String }
//!
//! impl Command for CreateObject {
//!     type Output = String;
//! }
//!
//! #[derive(Debug, Clone)]
//! struct ObjectCreated { id: String }
//!
//! impl Event for ObjectCreated {}
//!
//! bus.handle(Message::command(CreateObject { id: "1".into() }))?;
//! bus.handle(Message::event(ObjectCreated { id: "1".into() }))?;
//! ```

mod command;
mod event;

use std::any::TypeId;
use std::fmt;

pub use command::{Command, CommandObject};
pub use event::{Event, EventObject, EventQueue};

/// A message on the bus: either a command or an event.
pub enum Message {
    Command(Box<dyn CommandObject>),
    Event(Box<dyn Event>),
}

impl Message {
    /// Wrap a command.
    pub fn command<C: Command>(command: C) -> Self {
        Message::Command(Box::new(command))
    }

    /// Wrap an event.
    pub fn event<E: Event>(event: E) -> Self {
        Message::Event(Box::new(event))
    }

    /// The routing key: the `TypeId` of the concrete command or event.
    pub fn message_type(&self) -> TypeId {
        match self {
            Message::Command(command) => command.message_type(),
            Message::Event(event) => event.message_type(),
        }
    }

    /// The concrete type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Command(command) => command.command_name(),
            Message::Event(event) => event.event_name(),
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Message::Command(_))
    }

    pub fn is_event(&self) -> bool {
        matches!(self, Message::Event(_))
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Message::Event(event) => f.debug_tuple("Event").field(event).finish(),
        }
    }
}
