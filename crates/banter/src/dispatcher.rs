//! Message dispatcher.
//!
//! The [`Dispatcher`] is the orchestrator of the whole pipeline: it tokenizes
//! inbound text, resolves candidate commands, runs the middleware chain, and
//! invokes handlers - for both the exact-command path (prefixed messages) and
//! the conversational path (classified intents).
//!
//! # Dispatch flow
//!
//! ```text
//! process(message)
//! ├── author is a bot            -> discard silently
//! ├── first token == prefix      -> exact-command path
//! │   ├── < 2 tokens             -> TooFewArguments
//! │   ├── find_by_name(token[1]) -> CommandNotFound when empty
//! │   ├── middleware chain       -> silent abort when gated
//! │   └── per candidate: parse arguments, invoke handler,
//! │       stop when a handler resolves true
//! └── otherwise                  -> conversational path
//!     ├── trigger-word gate      -> silent no-op when ineligible
//!     ├── classify(language, text)
//!     ├── "None" intent or low score -> silent no-op
//!     ├── middleware chain       -> silent abort when gated
//!     └── per candidate: invoke handler, same stop signal
//! ```
//!
//! Any error raised along the way is caught once at the top of
//! [`process`](Dispatcher::process), formatted by the active error formatter,
//! and sent back to the originating conversation. Nothing propagates past
//! `process`.
//!
//! # Concurrency
//!
//! `process` takes `&self`; distinct invocations may run concurrently. Within
//! one invocation, middleware and handlers are awaited strictly in
//! registration order. The registries are append-only before the first message
//! is processed; the only interior mutability is the replaceable formatter.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{Instrument, Level, debug, error, span, trace};

use banter_core::{InboundMessage, IntentClassifier};

use crate::argv::{parse_arguments, split_tokens};
use crate::command::{Command, ConverseCommand};
use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::middleware::{Candidates, Middleware, into_middleware};
use crate::registry::Registry;
use crate::report::{ErrorFormatter, default_formatter};

/// Offset skipping the prefix token and the command-name token.
const COMMAND_ARG_OFFSET: usize = 2;

/// The central message dispatcher.
///
/// # Example
///
/// ```
/// use banter::{ArgSpec, Command, DispatchConfig, Dispatcher};
///
/// let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
/// dispatcher.add(
///     Command::new("echo")
///         .description("Echoes its arguments")
///         .arg(ArgSpec::Str)
///         .handler(|msg, args| async move {
///             msg.reply(&args[0].to_string()).await.ok();
///             Ok(true)
///         }),
/// );
/// ```
pub struct Dispatcher {
    registry: Registry,
    config: DispatchConfig,
    classifier: Option<Arc<dyn IntentClassifier>>,
    formatter: RwLock<ErrorFormatter>,
}

impl Dispatcher {
    /// Creates a dispatcher with the given configuration and no classifier.
    ///
    /// Without a classifier, non-prefixed messages are silently ignored.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
            classifier: None,
            formatter: RwLock::new(default_formatter()),
        }
    }

    /// Installs the classifier collaborator for the conversational path.
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Registers an exact-match command.
    pub fn add(&mut self, command: Command) {
        self.registry.add(command);
    }

    /// Registers a conversational command.
    pub fn add_converse(&mut self, command: ConverseCommand) {
        self.registry.add_converse(command);
    }

    /// Registers a gating middleware ("default"), consulted before any
    /// handler runs.
    pub fn add_default<F, Fut>(&mut self, middleware: F)
    where
        F: Fn(InboundMessage, Candidates) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DispatchResult<bool>> + Send + 'static,
    {
        self.registry.add_default(into_middleware(middleware));
    }

    /// Registers a pre-built boxed middleware.
    pub fn add_default_boxed(&mut self, middleware: Middleware) {
        self.registry.add_default(middleware);
    }

    /// Replaces the active error formatter.
    pub fn set_error_formatter(&self, formatter: ErrorFormatter) {
        *self.formatter.write() = formatter;
    }

    /// Returns the registry, for introspection (e.g. help generation).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Processes one inbound message.
    ///
    /// This is the single recovery boundary for the core: any fault raised by
    /// tokenizing, lookup, middleware, argument parsing, the classifier, or a
    /// handler is formatted and sent back to the originating conversation.
    /// This method never returns an error.
    pub async fn process(&self, message: InboundMessage) {
        let span = span!(Level::DEBUG, "process", author = %message.author.id);
        async {
            if message.author.is_bot {
                trace!("discarding message from automated participant");
                return;
            }

            if let Err(err) = self.dispatch(&message).await {
                debug!(%err, "dispatch failed, reporting to conversation");
                let text = {
                    let formatter = self.formatter.read();
                    formatter(&message, &err)
                };
                if let Err(send_err) = message.reply(&text).await {
                    error!(%send_err, "failed to deliver error report");
                }
            }
        }
        .instrument(span)
        .await;
    }

    /// Routes one message down the exact-command or conversational path.
    async fn dispatch(&self, message: &InboundMessage) -> DispatchResult<()> {
        let tokens = split_tokens(&message.text, &self.config.separator);

        if tokens.first().map(String::as_str) == Some(self.config.prefix.as_str()) {
            self.dispatch_command(message, &tokens).await
        } else {
            self.dispatch_converse(message).await
        }
    }

    /// Exact-command path: lookup by name, gate, parse, invoke.
    async fn dispatch_command(
        &self,
        message: &InboundMessage,
        tokens: &[String],
    ) -> DispatchResult<()> {
        if tokens.len() < 2 {
            return Err(DispatchError::TooFewArguments);
        }
        let name = &tokens[1];

        let candidates = self.registry.find_by_name(name);
        if candidates.is_empty() {
            return Err(DispatchError::CommandNotFound { name: name.clone() });
        }
        debug!(name = %name, candidates = candidates.len(), "resolved command candidates");

        if !self
            .run_defaults(message, Candidates::Command(candidates.clone()))
            .await?
        {
            return Ok(());
        }

        for command in candidates {
            let args = parse_arguments(
                tokens,
                command.spec(),
                COMMAND_ARG_OFFSET,
                &self.config.separator,
            )?;
            let handled = (command.handler_fn())(message.clone(), args).await?;
            if handled {
                trace!("handler signaled completion, stopping candidate loop");
                break;
            }
        }
        Ok(())
    }

    /// Conversational path: classify, gate on confidence, invoke by intent.
    async fn dispatch_converse(&self, message: &InboundMessage) -> DispatchResult<()> {
        if !self.config.converse.is_eligible(&message.text) {
            trace!("no trigger substring present, skipping classifier");
            return Ok(());
        }
        let Some(classifier) = &self.classifier else {
            trace!("no classifier installed, ignoring non-prefixed message");
            return Ok(());
        };

        let result = classifier
            .classify(&self.config.converse.language, &message.text)
            .await?;

        if result.is_none() || result.score < self.config.converse.min_confidence {
            debug!(
                intent = %result.intent,
                score = result.score,
                "classification below dispatch threshold"
            );
            return Ok(());
        }

        let candidates = self.registry.find_by_intent(&result.intent);
        debug!(intent = %result.intent, candidates = candidates.len(), "resolved intent candidates");

        if !self
            .run_defaults(message, Candidates::Converse(candidates.clone()))
            .await?
        {
            return Ok(());
        }

        for command in candidates {
            let handled = (command.handler_fn())(
                message.clone(),
                result.entities.clone(),
                result.clone(),
            )
            .await?;
            if handled {
                trace!("converse handler signaled completion, stopping candidate loop");
                break;
            }
        }
        Ok(())
    }

    /// Runs the middleware chain; `Ok(false)` means the invocation is gated.
    async fn run_defaults(
        &self,
        message: &InboundMessage,
        candidates: Candidates,
    ) -> DispatchResult<bool> {
        for middleware in self.registry.defaults() {
            let allowed = middleware(message.clone(), candidates.clone()).await?;
            if !allowed {
                debug!("middleware vetoed invocation");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("has_classifier", &self.classifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use banter_core::{
        Author, ChannelResult, Classification, ClassifyError, ClassifyResult, Conversation, Entity,
    };

    use crate::argv::{ArgSpec, ArgValue};

    struct RecordingConversation {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingConversation {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Conversation for RecordingConversation {
        async fn send(&self, text: &str) -> ChannelResult<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct FixedClassifier {
        result: Classification,
        calls: AtomicUsize,
    }

    impl FixedClassifier {
        fn new(result: Classification) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IntentClassifier for FixedClassifier {
        async fn classify(&self, _language: &str, _text: &str) -> ClassifyResult<Classification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl IntentClassifier for FailingClassifier {
        async fn classify(&self, _language: &str, _text: &str) -> ClassifyResult<Classification> {
            Err(ClassifyError::Backend("model exploded".into()))
        }
    }

    fn message(text: &str, conv: &Arc<RecordingConversation>) -> InboundMessage {
        InboundMessage::new(text, Author::new("518"), conv.clone())
    }

    fn counting_command(name: &str, count: &Arc<AtomicUsize>, handled: bool) -> Command {
        let count = Arc::clone(count);
        Command::new(name).handler(move |_, _| {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(handled)
            }
        })
    }

    fn counting_converse(intent: &str, count: &Arc<AtomicUsize>, handled: bool) -> ConverseCommand {
        let count = Arc::clone(count);
        ConverseCommand::new(intent).handler(move |_, _, _| {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(handled)
            }
        })
    }

    #[tokio::test]
    async fn unknown_command_replies_with_formatted_error() {
        let dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof nope", &conv)).await;

        assert_eq!(conv.sent(), ["<@518> Error: command not found: nope"]);
    }

    #[tokio::test]
    async fn bare_prefix_reports_too_few_arguments() {
        let dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof", &conv)).await;

        assert_eq!(conv.sent(), ["<@518> Error: too few arguments"]);
    }

    #[tokio::test]
    async fn handler_receives_typed_arguments() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(
            Command::new("add")
                .arg(ArgSpec::Num)
                .arg(ArgSpec::Num)
                .handler(|msg, args| async move {
                    let total = args[0].as_num().unwrap() + args[1].as_num().unwrap();
                    msg.reply(&total.to_string()).await.ok();
                    Ok(true)
                }),
        );
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof add 1 2", &conv)).await;

        assert_eq!(conv.sent(), ["3"]);
    }

    #[tokio::test]
    async fn parse_failure_is_reported_not_raised() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(Command::new("add").args([ArgSpec::Num, ArgSpec::Num]));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof add 1 abc", &conv)).await;

        assert_eq!(conv.sent(), ["<@518> Error: invalid number in argument: abc"]);
    }

    #[tokio::test]
    async fn quoted_arguments_cross_token_boundaries() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(Command::new("say").arg(ArgSpec::Str).handler(
            |msg, args| async move {
                msg.reply(args[0].as_str().unwrap()).await.ok();
                Ok(true)
            },
        ));
        let conv = RecordingConversation::new();

        dispatcher
            .process(message("-oof say \"hello world\"", &conv))
            .await;

        assert_eq!(conv.sent(), ["hello world"]);
    }

    #[tokio::test]
    async fn middleware_false_prevents_all_handlers() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(counting_command("echo", &count, true));
        dispatcher.add_default(|_, _| async { Ok(false) });
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo", &conv)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        // Gated invocations abort silently: no reply, no error.
        assert!(conv.sent().is_empty());
    }

    #[tokio::test]
    async fn middleware_true_lets_chain_and_handlers_run() {
        let count = Arc::new(AtomicUsize::new(0));
        let gate_calls = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(counting_command("echo", &count, true));

        let first = Arc::clone(&gate_calls);
        dispatcher.add_default(move |_, _| {
            let first = Arc::clone(&first);
            async move {
                first.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        });
        let second = Arc::clone(&gate_calls);
        dispatcher.add_default(move |_, candidates| {
            let second = Arc::clone(&second);
            async move {
                assert_eq!(candidates.labels(), ["echo"]);
                second.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        });
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo", &conv)).await;

        assert_eq!(gate_calls.load(Ordering::SeqCst), 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_true_stops_candidate_loop() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(counting_command("echo", &first, true));
        dispatcher.add(counting_command("echo", &second, true));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo", &conv)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_false_tries_next_candidate() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(counting_command("echo", &first, false));
        dispatcher.add(counting_command("echo", &second, true));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo", &conv)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bot_authors_are_discarded_silently() {
        let dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        let conv = RecordingConversation::new();
        let msg = InboundMessage::new("-oof nope", Author::bot("666"), conv.clone());

        dispatcher.process(msg).await;

        assert!(conv.sent().is_empty());
    }

    #[tokio::test]
    async fn none_intent_never_reaches_handlers() {
        let count = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier::new(Classification::new("None", 0.9));
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier.clone());
        dispatcher.add_converse(counting_converse("None", &count, true));
        let conv = RecordingConversation::new();

        dispatcher.process(message("whatever", &conv)).await;

        assert_eq!(classifier.call_count(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn low_confidence_is_gated() {
        let count = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier::new(Classification::new("greet", 0.4));
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier);
        dispatcher.add_converse(counting_converse("greet", &count, true));
        let conv = RecordingConversation::new();

        dispatcher.process(message("hello there", &conv)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(conv.sent().is_empty());
    }

    #[tokio::test]
    async fn sufficient_confidence_dispatches() {
        let count = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier::new(Classification::new("greet", 0.6));
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier);
        dispatcher.add_converse(counting_converse("greet", &count, true));
        let conv = RecordingConversation::new();

        dispatcher.process(message("hello there", &conv)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn trigger_words_gate_classifier_invocation() {
        let classifier = FixedClassifier::new(Classification::new("greet", 0.9));
        let config = DispatchConfig::new("-oof").must_include(["help"]);
        let dispatcher = Dispatcher::new(config).with_classifier(classifier.clone());
        let conv = RecordingConversation::new();

        dispatcher.process(message("good morning", &conv)).await;
        assert_eq!(classifier.call_count(), 0);

        dispatcher.process(message("I need HELP please", &conv)).await;
        assert_eq!(classifier.call_count(), 1);
    }

    #[tokio::test]
    async fn prefixed_messages_never_reach_classifier() {
        let classifier = FixedClassifier::new(Classification::new("greet", 0.9));
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier.clone());
        dispatcher.add(Command::new("echo").handler(|_, _| async { Ok(true) }));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo", &conv)).await;

        assert_eq!(classifier.call_count(), 0);
    }

    #[tokio::test]
    async fn converse_handler_receives_entities_and_classification() {
        let result = Classification::new("weather", 0.8)
            .with_entities(vec![Entity::new("city", "Oslo")]);
        let classifier = FixedClassifier::new(result);
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier);
        dispatcher.add_converse(ConverseCommand::new("weather").handler(
            |msg, entities, classification| async move {
                assert_eq!(entities.len(), 1);
                assert_eq!(entities[0].name, "city");
                assert_eq!(classification.intent, "weather");
                msg.reply("sunny").await.ok();
                Ok(true)
            },
        ));
        let conv = RecordingConversation::new();

        dispatcher
            .process(message("what's the weather in Oslo", &conv))
            .await;

        assert_eq!(conv.sent(), ["sunny"]);
    }

    #[tokio::test]
    async fn middleware_gates_converse_path_too() {
        let count = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier::new(Classification::new("greet", 0.9));
        let mut dispatcher =
            Dispatcher::new(DispatchConfig::new("-oof")).with_classifier(classifier);
        dispatcher.add_converse(counting_converse("greet", &count, true));
        dispatcher.add_default(|_, candidates| async move {
            Ok(!matches!(candidates, Candidates::Converse(_)))
        });
        let conv = RecordingConversation::new();

        dispatcher.process(message("hello there", &conv)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn classifier_failure_surfaces_through_formatter() {
        let dispatcher = Dispatcher::new(DispatchConfig::new("-oof"))
            .with_classifier(Arc::new(FailingClassifier));
        let conv = RecordingConversation::new();

        dispatcher.process(message("hello there", &conv)).await;

        assert_eq!(
            conv.sent(),
            ["<@518> Error: classifier backend error: model exploded"]
        );
    }

    #[tokio::test]
    async fn custom_formatter_replaces_default() {
        let dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.set_error_formatter(Arc::new(|msg, err| {
            format!("sorry {}: {err}", msg.author.id)
        }));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof nope", &conv)).await;

        assert_eq!(conv.sent(), ["sorry 518: command not found: nope"]);
    }

    #[tokio::test]
    async fn handler_error_is_reported() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(
            Command::new("boom")
                .handler(|_, _| async { Err(DispatchError::handler("kaboom")) }),
        );
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof boom", &conv)).await;

        assert_eq!(conv.sent(), ["<@518> Error: handler error: kaboom"]);
    }

    #[tokio::test]
    async fn trailing_tail_arrives_as_raw_strings() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
        dispatcher.add(Command::new("echo").handler(|msg, args| async move {
            let joined = args
                .iter()
                .map(ArgValue::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            msg.reply(&joined).await.ok();
            Ok(true)
        }));
        let conv = RecordingConversation::new();

        dispatcher.process(message("-oof echo a b c", &conv)).await;

        assert_eq!(conv.sent(), ["a b c"]);
    }
}
