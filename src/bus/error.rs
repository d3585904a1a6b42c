//! Error types for handlers and the message bus.

use std::error::Error;

use crate::unit_of_work::UowError;

/// Error returned by a command or event handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Business logic rejected the message (validation, invariant violation).
    #[error("rejected: {0}")]
    Rejected(String),
    /// An entity the handler needed does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Repository lookup, commit or rollback failed.
    #[error("unit of work error: {0}")]
    UnitOfWork(#[from] UowError),
    /// The erased message did not have the type the handler was registered for.
    #[error("handler expected a {expected}")]
    TypeMismatch { expected: &'static str },
    /// Any other failure.
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        HandlerError::Rejected(reason.into())
    }

    pub fn other(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        HandlerError::Other(source.into())
    }
}

/// Error returned by [`MessageBus::handle`](super::MessageBus::handle).
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A command was dispatched with no handler registered for its type.
    #[error("no handler registered for command {0}")]
    CommandHandlerNotFound(&'static str),
    /// A command handler failed. The handler's error is passed through as is.
    #[error(transparent)]
    Handler(#[from] HandlerError),
    /// The unit of work could not be borrowed to collect events.
    #[error("unit of work error: {0}")]
    UnitOfWork(#[from] UowError),
    /// One `handle` call processed more messages than configured.
    #[error("message limit of {limit} exceeded at {message}")]
    MessageLimitExceeded { limit: usize, message: &'static str },
    /// The top-level command produced no result, or not of the expected type.
    #[error("command {command} did not return its declared output")]
    ResultTypeMismatch { command: &'static str },
}
