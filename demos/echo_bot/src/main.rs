//! Echo Bot Example
//!
//! A console-driven demonstration of the Banter dispatcher. Each line typed
//! on stdin becomes one inbound message; replies are printed back to the
//! terminal. A tiny rule-based classifier stands in for a real NLP backend so
//! the conversational path can be exercised without model files.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot
//! ```
//!
//! Then try:
//!
//! ```text
//! -oof echo hello world
//! -oof add 1 2
//! -oof say "hello there" 42
//! hello bot
//! bye bot
//! -oof nope
//! ```

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use banter::core::{ChannelResult, ClassifyResult};
use banter::prelude::*;
use banter_runtime::{config::ConfigLoader, logging};

// ============================================================================
// Collaborators: console transport and rule-based classifier
// ============================================================================

/// Prints replies to the terminal.
struct ConsoleConversation;

#[async_trait]
impl Conversation for ConsoleConversation {
    async fn send(&self, text: &str) -> ChannelResult<()> {
        println!("bot> {text}");
        Ok(())
    }
}

/// A stand-in classifier: scores a handful of intents by keyword.
struct RuleClassifier;

#[async_trait]
impl IntentClassifier for RuleClassifier {
    async fn classify(&self, _language: &str, text: &str) -> ClassifyResult<Classification> {
        let lowered = text.to_lowercase();
        let hit = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

        if hit(&["hello", "hi ", "hey"]) {
            Ok(Classification::new("greet", 0.9)
                .with_entities(vec![Entity::new("utterance", text)]))
        } else if hit(&["bye", "goodbye", "later"]) {
            Ok(Classification::new("farewell", 0.8))
        } else {
            Ok(Classification::none())
        }
    }
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new().merge(demo_config()).load()?;
    logging::init_from_config(&config.logging);

    let mut dispatcher =
        Dispatcher::new(config.dispatch.clone()).with_classifier(Arc::new(RuleClassifier));

    // Gate: ignore a blocked author, log everything else.
    dispatcher.add_default(|msg, candidates| async move {
        if msg.author.id == "blocked" {
            return Ok(false);
        }
        info!(author = %msg.author.id, candidates = candidates.len(), "dispatching");
        Ok(true)
    });

    dispatcher.add(
        Command::new("echo")
            .description("Echoes its arguments back")
            .handler(|msg, args| async move {
                let joined = args
                    .iter()
                    .map(ArgValue::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                msg.reply(&joined).await.ok();
                Ok(true)
            }),
    );

    dispatcher.add(
        Command::new("add")
            .alias("sum")
            .description("Adds two numbers")
            .args([ArgSpec::Num, ArgSpec::Num])
            .handler(|msg, args| async move {
                let total = args[0].as_num().unwrap_or(0.0) + args[1].as_num().unwrap_or(0.0);
                msg.reply(&format!("= {total}")).await.ok();
                Ok(true)
            }),
    );

    dispatcher.add(
        Command::new("say")
            .description("Repeats a quoted string a given number of times")
            .args([ArgSpec::Str, ArgSpec::Num])
            .handler(|msg, args| async move {
                let text = args[0].as_str().unwrap_or_default();
                let times = args[1].as_num().unwrap_or(1.0).max(1.0) as usize;
                msg.reply(&vec![text; times.min(10)].join(" ")).await.ok();
                Ok(true)
            }),
    );

    dispatcher.add_converse(
        ConverseCommand::new("greet")
            .help("hello bot", "Replies to greetings")
            .handler(|msg, _entities, result| async move {
                msg.reply(&format!("hi there! (confidence {:.2})", result.score))
                    .await
                    .ok();
                Ok(true)
            }),
    );

    dispatcher.add_converse(
        ConverseCommand::new("farewell")
            .help("bye bot", "Says goodbye")
            .handler(|msg, _entities, _result| async move {
                msg.reply("see you!").await.ok();
                Ok(true)
            }),
    );

    info!(prefix = %dispatcher.config().prefix, "echo bot ready, type a message");

    let channel: Arc<dyn Conversation> = Arc::new(ConsoleConversation);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let message = InboundMessage::new(line, Author::new("console"), Arc::clone(&channel));
        dispatcher.process(message).await;
    }

    Ok(())
}

/// Programmatic defaults for the demo: `-oof` prefix, conversational routing
/// restricted to messages that mention the bot.
fn demo_config() -> banter_runtime::BanterConfig {
    let mut config = banter_runtime::BanterConfig::default();
    config.dispatch = banter::DispatchConfig::new("-oof").must_include(["bot", "hello", "bye"]);
    config
}
