//! Command definitions.
//!
//! Two command shapes exist:
//!
//! - [`Command`] - matched by literal name on prefixed messages, receives
//!   typed positional arguments
//! - [`ConverseCommand`] - matched by classified intent on non-prefixed
//!   messages, receives extracted entities and the full classification
//!
//! Both are created with consuming builders and are immutable once registered.
//! Handlers are uniformly async and resolve to `Result<bool, DispatchError>`:
//! `Ok(true)` means "fully handled, stop trying further candidates",
//! `Ok(false)` means "not handled, try the next one". The contract is the same
//! for every handler regardless of how it is written.

use std::sync::Arc;

use futures::future::BoxFuture;

use banter_core::{Classification, Entity, InboundMessage};

use crate::argv::{ArgSpec, ArgValue};
use crate::error::DispatchResult;

/// Type-erased handler for a named command.
///
/// Receives the inbound message and the parsed positional arguments.
pub type CommandHandler =
    Arc<dyn Fn(InboundMessage, Vec<ArgValue>) -> BoxFuture<'static, DispatchResult<bool>> + Send + Sync>;

/// Type-erased handler for a conversational command.
///
/// Receives the inbound message, the extracted entities, and the full
/// classification result.
pub type ConverseHandler = Arc<
    dyn Fn(InboundMessage, Vec<Entity>, Classification) -> BoxFuture<'static, DispatchResult<bool>>
        + Send
        + Sync,
>;

/// A command matched by exact name on prefixed messages.
///
/// # Example
///
/// ```
/// use banter::{ArgSpec, Command};
///
/// let cmd = Command::new("add")
///     .alias("sum")
///     .description("Adds two numbers")
///     .arg(ArgSpec::Num)
///     .arg(ArgSpec::Num)
///     .handler(|msg, args| async move {
///         let total = args[0].as_num().unwrap() + args[1].as_num().unwrap();
///         msg.reply(&total.to_string()).await.ok();
///         Ok(true)
///     });
/// assert!(cmd.matches("sum"));
/// ```
#[derive(Clone)]
pub struct Command {
    names: Vec<String>,
    description: Option<String>,
    spec: Vec<ArgSpec>,
    handler: CommandHandler,
}

impl Command {
    /// Creates a command with a single name and no arguments.
    ///
    /// A command without an explicit handler matches but never reports itself
    /// handled, so dispatch falls through to the next candidate.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            description: None,
            spec: Vec::new(),
            handler: Arc::new(|_, _| Box::pin(async { Ok(false) })),
        }
    }

    /// Adds an alias; all names match case-sensitively.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Sets the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends one entry to the argument type spec.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.spec.push(spec);
        self
    }

    /// Replaces the whole argument type spec.
    pub fn args(mut self, spec: impl IntoIterator<Item = ArgSpec>) -> Self {
        self.spec = spec.into_iter().collect();
        self
    }

    /// Sets the handler.
    pub fn handler<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(InboundMessage, Vec<ArgValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<bool>> + Send + 'static,
    {
        self.handler = Arc::new(move |msg, args| Box::pin(f(msg, args)));
        self
    }

    /// Returns `true` if `name` equals one of this command's names.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The registered names, primary name first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The human-readable description, if set.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The argument type spec.
    pub fn spec(&self) -> &[ArgSpec] {
        &self.spec
    }

    pub(crate) fn handler_fn(&self) -> &CommandHandler {
        &self.handler
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("names", &self.names)
            .field("description", &self.description)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Help metadata for a conversational command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverseHelp {
    /// An example utterance that triggers the command.
    pub example: String,
    /// What the command does.
    pub description: String,
}

/// A command matched by classified intent on non-prefixed messages.
#[derive(Clone)]
pub struct ConverseCommand {
    intents: Vec<String>,
    help: Option<ConverseHelp>,
    handler: ConverseHandler,
}

impl ConverseCommand {
    /// Creates a conversational command for a single intent label.
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intents: vec![intent.into()],
            help: None,
            handler: Arc::new(|_, _, _| Box::pin(async { Ok(false) })),
        }
    }

    /// Adds another intent label this command responds to.
    pub fn intent(mut self, intent: impl Into<String>) -> Self {
        self.intents.push(intent.into());
        self
    }

    /// Sets the help metadata.
    pub fn help(mut self, example: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = Some(ConverseHelp {
            example: example.into(),
            description: description.into(),
        });
        self
    }

    /// Sets the handler.
    pub fn handler<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(InboundMessage, Vec<Entity>, Classification) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<bool>> + Send + 'static,
    {
        self.handler = Arc::new(move |msg, entities, result| Box::pin(f(msg, entities, result)));
        self
    }

    /// Returns `true` if `intent` equals one of this command's intent labels.
    pub fn matches(&self, intent: &str) -> bool {
        self.intents.iter().any(|i| i == intent)
    }

    /// The registered intent labels.
    pub fn intents(&self) -> &[String] {
        &self.intents
    }

    /// The help metadata, if set.
    pub fn get_help(&self) -> Option<&ConverseHelp> {
        self.help.as_ref()
    }

    pub(crate) fn handler_fn(&self) -> &ConverseHandler {
        &self.handler
    }
}

impl std::fmt::Debug for ConverseCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverseCommand")
            .field("intents", &self.intents)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching_is_exact_membership() {
        let cmd = Command::new("echo").alias("say");
        assert!(cmd.matches("echo"));
        assert!(cmd.matches("say"));
        assert!(!cmd.matches("ech"));
        assert!(!cmd.matches("Echo"));
    }

    #[test]
    fn intent_matching_is_exact_membership() {
        let cmd = ConverseCommand::new("greet").intent("hello");
        assert!(cmd.matches("greet"));
        assert!(cmd.matches("hello"));
        assert!(!cmd.matches("greeting"));
    }

    #[test]
    fn builder_accumulates_shape() {
        let cmd = Command::new("add")
            .description("Adds numbers")
            .args([ArgSpec::Num, ArgSpec::Num]);
        assert_eq!(cmd.get_description(), Some("Adds numbers"));
        assert_eq!(cmd.spec().len(), 2);
    }
}
