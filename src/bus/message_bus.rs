//! MessageBus - dispatch loop over a shared unit of work.
//!
//! `handle` processes one top-level message and everything it causes: after
//! each message the bus collects the events entities raised through the unit
//! of work and appends them to its queue, so a cascade runs breadth-first
//! within the same call.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::handlers::{InjectedCommand, InjectedEvent, InjectedHandlers};
use super::BusError;
use crate::config::BusConfig;
use crate::message::{Command, CommandObject, Event, Message};
use crate::unit_of_work::Uow;

pub struct MessageBus {
    uow: Uow,
    command_handlers: HashMap<TypeId, InjectedCommand>,
    event_handlers: HashMap<TypeId, Vec<InjectedEvent>>,
    queue: VecDeque<Message>,
    config: BusConfig,
}

impl MessageBus {
    /// Bind injected handler tables to the unit of work they were injected with.
    pub fn new(uow: Uow, handlers: InjectedHandlers, config: BusConfig) -> Self {
        MessageBus {
            uow,
            command_handlers: handlers.commands,
            event_handlers: handlers.events,
            queue: VecDeque::new(),
            config,
        }
    }

    /// Dispatch `message` and every event it transitively causes.
    ///
    /// Returns the command handler's output when `message` is a command, and
    /// `None` for an event. A failing command handler aborts the rest of the
    /// queue and its error is returned; failing event handlers are logged and
    /// skipped.
    pub fn handle(&mut self, message: Message) -> Result<Option<Box<dyn Any>>, BusError> {
        self.queue.clear();
        self.queue.push_back(message);

        let mut result = None;
        let mut processed = 0usize;
        while let Some(message) = self.queue.pop_front() {
            processed += 1;
            if let Some(limit) = self.config.max_messages {
                if processed > limit {
                    self.queue.clear();
                    return Err(BusError::MessageLimitExceeded {
                        limit,
                        message: message.name(),
                    });
                }
            }

            tracing::trace!(message = message.name(), pending = self.queue.len(), "dispatching");
            match message {
                Message::Command(command) => match self.dispatch_command(command) {
                    Ok(output) if processed == 1 => result = Some(output),
                    Ok(_) => {}
                    Err(err) => {
                        self.queue.clear();
                        self.discard_new_events();
                        return Err(err);
                    }
                },
                Message::Event(event) => self.dispatch_event(&*event),
            }

            if let Err(err) = self.enqueue_new_events() {
                self.queue.clear();
                return Err(err);
            }
        }

        Ok(result)
    }

    /// Dispatch a command and return its typed output.
    pub fn execute<C: Command>(&mut self, command: C) -> Result<C::Output, BusError> {
        let mismatch = || BusError::ResultTypeMismatch {
            command: type_name::<C>(),
        };
        let output = self.handle(Message::command(command))?.ok_or_else(mismatch)?;
        output
            .downcast::<C::Output>()
            .map(|output| *output)
            .map_err(|_| mismatch())
    }

    /// Dispatch an event and its cascade.
    pub fn publish<E: Event>(&mut self, event: E) -> Result<(), BusError> {
        self.handle(Message::event(event)).map(|_| ())
    }

    /// Names of the command types this bus can handle.
    pub fn commands(&self) -> Vec<&'static str> {
        self.command_handlers
            .values()
            .map(|entry| entry.command)
            .collect()
    }

    /// The unit of work every handler on this bus shares.
    pub fn uow(&self) -> &Uow {
        &self.uow
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    fn dispatch_command(&self, command: Box<dyn CommandObject>) -> Result<Box<dyn Any>, BusError> {
        let name = command.command_name();
        let entry = self
            .command_handlers
            .get(&command.message_type())
            .ok_or(BusError::CommandHandlerNotFound(name))?;

        (entry.call)(command).map_err(|err| {
            tracing::error!(command = name, handler = entry.handler, error = %err, "command handler failed");
            BusError::Handler(err)
        })
    }

    fn dispatch_event(&self, event: &dyn Event) {
        let Some(handlers) = self.event_handlers.get(&event.message_type()) else {
            tracing::trace!(event = event.event_name(), "no handlers for event");
            return;
        };

        for entry in handlers {
            if let Err(err) = (entry.call)(event) {
                tracing::error!(
                    event = event.event_name(),
                    handler = entry.handler,
                    error = %err,
                    "event handler failed"
                );
            }
        }
    }

    fn enqueue_new_events(&mut self) -> Result<(), BusError> {
        let mut uow = self.uow.borrow_mut()?;
        self.queue
            .extend(uow.collect_new_events().map(Message::Event));
        Ok(())
    }

    /// Drop events a failed command left behind, so a later call never
    /// dispatches them.
    fn discard_new_events(&self) {
        let Ok(mut uow) = self.uow.borrow_mut() else {
            return;
        };
        let discarded = uow.collect_new_events().count();
        if discarded > 0 {
            tracing::debug!(discarded, "discarded events of failed command");
        }
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("commands", &self.commands())
            .field("event_types", &self.event_handlers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
