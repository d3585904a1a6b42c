use std::any::{type_name, Any, TypeId};
use std::fmt;

/// A request to change state, handled by exactly one handler.
///
/// `Output` is what the handler returns to the caller of the bus.
pub trait Command: fmt::Debug + Send + 'static {
    type Output: 'static;
}

/// Type-erased view of a command, as it travels through the bus queue.
///
/// Implemented for every [`Command`]; not meant to be implemented by hand.
pub trait CommandObject: fmt::Debug + Send {
    fn message_type(&self) -> TypeId;
    fn command_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<C: Command> CommandObject for C {
    fn message_type(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn command_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}
