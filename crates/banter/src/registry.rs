//! Command registry.
//!
//! Holds the exact-match commands, the conversational commands, and the
//! middleware chain in registration order. Lookups are linear scans over
//! list-membership equality - at typical scale (tens of entries) anything
//! fancier would be noise. No deduplication: registering the same name twice
//! means both commands are candidates, dispatched to in registration order.
//!
//! The registry is append-only by contract. Registration happens during
//! setup, before the first message is processed; it is not synchronized for
//! concurrent mutation during live dispatch.

use std::sync::Arc;

use crate::command::{Command, ConverseCommand};
use crate::middleware::Middleware;

/// Ordered collections of registered commands and middleware.
#[derive(Default, Clone)]
pub struct Registry {
    commands: Vec<Arc<Command>>,
    converse: Vec<Arc<ConverseCommand>>,
    defaults: Vec<Middleware>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exact-match command.
    pub fn add(&mut self, command: Command) {
        self.commands.push(Arc::new(command));
    }

    /// Registers a conversational command.
    pub fn add_converse(&mut self, command: ConverseCommand) {
        self.converse.push(Arc::new(command));
    }

    /// Registers a gating middleware ("default").
    pub fn add_default(&mut self, middleware: Middleware) {
        self.defaults.push(middleware);
    }

    /// All commands whose name list contains `name`, in registration order.
    pub fn find_by_name(&self, name: &str) -> Vec<Arc<Command>> {
        self.commands
            .iter()
            .filter(|cmd| cmd.matches(name))
            .cloned()
            .collect()
    }

    /// All conversational commands whose intent list contains `intent`,
    /// in registration order.
    pub fn find_by_intent(&self, intent: &str) -> Vec<Arc<ConverseCommand>> {
        self.converse
            .iter()
            .filter(|cmd| cmd.matches(intent))
            .cloned()
            .collect()
    }

    /// The middleware chain, in registration order.
    pub fn defaults(&self) -> &[Middleware] {
        &self.defaults
    }

    /// All registered exact-match commands.
    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    /// All registered conversational commands.
    pub fn converse_commands(&self) -> &[Arc<ConverseCommand>] {
        &self.converse
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands.len())
            .field("converse", &self.converse.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}
