//! # Banter
//!
//! A text-command dispatcher for chat messages. Given a stream of decoded
//! inbound messages, Banter decides whether each one invokes a registered
//! command or matches a conversational intent, extracts and type-checks its
//! arguments, and routes it to a handler while honoring pluggable gating
//! middleware.
//!
//! The messaging transport and the NLP classifier are injected collaborators
//! (see [`banter_core`]); this crate is only the dispatch core.
//!
//! # Quick start
//!
//! ```
//! use banter::{ArgSpec, Command, ConverseCommand, DispatchConfig, Dispatcher};
//!
//! let mut dispatcher = Dispatcher::new(DispatchConfig::new("-oof"));
//!
//! // Exact-match command: "-oof add 1 2"
//! dispatcher.add(
//!     Command::new("add")
//!         .description("Adds two numbers")
//!         .args([ArgSpec::Num, ArgSpec::Num])
//!         .handler(|msg, args| async move {
//!             let total = args[0].as_num().unwrap() + args[1].as_num().unwrap();
//!             msg.reply(&total.to_string()).await.ok();
//!             Ok(true)
//!         }),
//! );
//!
//! // Conversational command, matched by classified intent.
//! dispatcher.add_converse(
//!     ConverseCommand::new("greet")
//!         .help("hello there", "Replies to greetings")
//!         .handler(|msg, _entities, _result| async move {
//!             msg.reply("hi!").await.ok();
//!             Ok(true)
//!         }),
//! );
//!
//! // Gating middleware: consulted before any handler runs.
//! dispatcher.add_default(|msg, _candidates| async move {
//!     Ok(msg.author.id != "blocked")
//! });
//! ```

pub mod argv;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod report;

pub use argv::{ArgSpec, ArgValue, CustomParser, parse_arguments, split_tokens};
pub use command::{Command, CommandHandler, ConverseCommand, ConverseHandler, ConverseHelp};
pub use config::{ConverseConfig, DispatchConfig};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult, ParseError, ParseResult};
pub use middleware::{Candidates, Middleware, into_middleware};
pub use registry::Registry;
pub use report::{ErrorFormatter, default_formatter};

// Re-export the collaborator surface so downstream crates can depend on
// `banter` alone.
pub use banter_core as core;

/// Commonly used items, for glob import in bot setup code.
pub mod prelude {
    pub use crate::{
        ArgSpec, ArgValue, Candidates, Command, ConverseCommand, DispatchConfig, DispatchError,
        Dispatcher,
    };
    pub use banter_core::{
        Author, Classification, Conversation, Entity, InboundMessage, IntentClassifier,
    };
}
