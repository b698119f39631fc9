//! Error types for the dispatch pipeline.
//!
//! Every fault raised while processing a single message is funneled into
//! [`DispatchError`], which the dispatcher catches at its top-level boundary
//! and hands to the active error formatter. Nothing in this taxonomy escapes
//! [`Dispatcher::process`](crate::Dispatcher::process).

use thiserror::Error;

use banter_core::ClassifyError;

/// Errors raised while coercing tokens against a command's argument spec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The type spec is longer than the remaining tokens.
    #[error("invalid amount of arguments: expected {expected}, got {received}")]
    ArgumentCount {
        /// Number of spec entries.
        expected: usize,
        /// Number of arguments successfully parsed before running out.
        received: usize,
    },

    /// A custom parser declined the token.
    #[error("could not parse argument '{token}' using custom parser")]
    Custom {
        /// The offending token.
        token: String,
    },

    /// A token declared as a number is not a valid floating-point literal.
    #[error("invalid number in argument: {token}")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
}

/// Errors raised during a single dispatch invocation.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// A prefixed message carried no command name.
    #[error("too few arguments")]
    TooFewArguments,

    /// No registered command matches the invoked name.
    #[error("command not found: {name}")]
    CommandNotFound {
        /// The name that failed to resolve.
        name: String,
    },

    /// Argument coercion failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The classifier collaborator failed.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// A handler or middleware reported a failure of its own.
    #[error("handler error: {0}")]
    Handler(String),
}

impl DispatchError {
    /// Creates a handler-reported error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
