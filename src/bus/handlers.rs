use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::HandlerError;
use crate::inject::{inject_command, inject_event, Dependencies, DependencyError, FromDependencies};
use crate::message::{Command, CommandObject, Event};

pub(crate) type CommandFn = Box<dyn Fn(Box<dyn CommandObject>) -> Result<Box<dyn Any>, HandlerError>>;
pub(crate) type EventFn = Box<dyn Fn(&dyn Event) -> Result<(), HandlerError>>;

type CommandBinder = Box<dyn Fn(&Dependencies) -> Result<CommandFn, DependencyError>>;
type EventBinder = Box<dyn Fn(&Dependencies) -> Result<EventFn, DependencyError>>;

struct CommandRegistration {
    command: &'static str,
    handler: &'static str,
    bind: CommandBinder,
}

struct EventRegistration {
    handler: &'static str,
    bind: EventBinder,
}

/// Handler tables, before dependencies are bound.
///
/// One handler per command type, any number per event type (kept in
/// registration order). Handlers take the message and their declared
/// dependencies; see [`FromDependencies`].
///
/// ## Example
///
/// ```ignore
/// let handlers = Handlers::new()
///     .command(create_object)
///     .event(notify_created)
///     .event(update_index);
/// ```
#[derive(Default)]
pub struct Handlers {
    commands: HashMap<TypeId, CommandRegistration>,
    events: HashMap<TypeId, Vec<EventRegistration>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for command type `C`. Returns `self` for chaining.
    ///
    /// A second registration for the same command replaces the first.
    pub fn command<C, D, F>(mut self, handler: F) -> Self
    where
        C: Command,
        D: FromDependencies + Clone + 'static,
        F: Fn(C, D) -> Result<C::Output, HandlerError> + 'static,
    {
        let handler = Rc::new(handler);
        let bind: CommandBinder = Box::new(move |dependencies: &Dependencies| {
            let handler = Rc::clone(&handler);
            let injected = inject_command(
                move |command: C, deps: D| (*handler)(command, deps),
                dependencies,
            )?;
            let erased: CommandFn = Box::new(move |command: Box<dyn CommandObject>| {
                let command = command
                    .into_any()
                    .downcast::<C>()
                    .map_err(|_| HandlerError::TypeMismatch {
                        expected: type_name::<C>(),
                    })?;
                let output = injected(*command)?;
                Ok(Box::new(output) as Box<dyn Any>)
            });
            Ok(erased)
        });

        let registration = CommandRegistration {
            command: type_name::<C>(),
            handler: type_name::<F>(),
            bind,
        };
        if let Some(replaced) = self.commands.insert(TypeId::of::<C>(), registration) {
            tracing::warn!(
                command = replaced.command,
                replaced = replaced.handler,
                "command handler replaced"
            );
        }
        self
    }

    /// Add a handler for event type `E`. Returns `self` for chaining.
    pub fn event<E, D, F>(mut self, handler: F) -> Self
    where
        E: Event,
        D: FromDependencies + Clone + 'static,
        F: Fn(&E, D) -> Result<(), HandlerError> + 'static,
    {
        let handler = Rc::new(handler);
        let bind: EventBinder = Box::new(move |dependencies: &Dependencies| {
            let handler = Rc::clone(&handler);
            let injected =
                inject_event(move |event: &E, deps: D| (*handler)(event, deps), dependencies)?;
            let erased: EventFn = Box::new(move |event: &dyn Event| {
                let event = event
                    .as_any()
                    .downcast_ref::<E>()
                    .ok_or(HandlerError::TypeMismatch {
                        expected: type_name::<E>(),
                    })?;
                injected(event)
            });
            Ok(erased)
        });

        self.events
            .entry(TypeId::of::<E>())
            .or_default()
            .push(EventRegistration {
                handler: type_name::<F>(),
                bind,
            });
        self
    }

    /// Names of the registered command types.
    pub fn commands(&self) -> Vec<&'static str> {
        self.commands.values().map(|entry| entry.command).collect()
    }

    /// Number of handlers registered for event type `E`.
    pub fn event_handler_count<E: Event>(&self) -> usize {
        self.events.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }

    /// Bind `dependencies` into every handler.
    ///
    /// Fails on the first handler that declares a dependency not present.
    pub fn inject(&self, dependencies: &Dependencies) -> Result<InjectedHandlers, DependencyError> {
        let mut commands = HashMap::with_capacity(self.commands.len());
        for (message_type, registration) in &self.commands {
            let call = (registration.bind)(dependencies)?;
            commands.insert(
                *message_type,
                InjectedCommand {
                    command: registration.command,
                    handler: registration.handler,
                    call,
                },
            );
        }

        let mut events = HashMap::with_capacity(self.events.len());
        for (message_type, registrations) in &self.events {
            let mut bound = Vec::with_capacity(registrations.len());
            for registration in registrations {
                bound.push(InjectedEvent {
                    handler: registration.handler,
                    call: (registration.bind)(dependencies)?,
                });
            }
            events.insert(*message_type, bound);
        }

        Ok(InjectedHandlers { commands, events })
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("commands", &self.commands())
            .field("event_types", &self.events.len())
            .finish()
    }
}

pub(crate) struct InjectedCommand {
    pub(crate) command: &'static str,
    pub(crate) handler: &'static str,
    pub(crate) call: CommandFn,
}

pub(crate) struct InjectedEvent {
    pub(crate) handler: &'static str,
    pub(crate) call: EventFn,
}

/// Handler tables with every dependency bound; ready for a [`MessageBus`](super::MessageBus).
pub struct InjectedHandlers {
    pub(crate) commands: HashMap<TypeId, InjectedCommand>,
    pub(crate) events: HashMap<TypeId, Vec<InjectedEvent>>,
}

impl InjectedHandlers {
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn event_handler_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }
}
