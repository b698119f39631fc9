//! Gating middleware ("defaults").
//!
//! Before any handler runs for an invocation, every registered middleware is
//! consulted in registration order with the inbound message and the candidate
//! set matched for that invocation. Each middleware resolves to a boolean
//! gate: `false` aborts the entire invocation immediately - no further
//! middleware, no handler. `true` lets the chain continue. This is the hook
//! for authorization, rate limiting, and logging-with-veto.

use std::sync::Arc;

use futures::future::BoxFuture;

use banter_core::InboundMessage;

use crate::command::{Command, ConverseCommand};
use crate::error::DispatchResult;

/// The candidate set handed to middleware for one invocation.
///
/// Exact-command and conversational invocations carry different command
/// shapes, so middleware receives a tagged view rather than a common trait.
#[derive(Debug, Clone)]
pub enum Candidates {
    /// Candidates matched by name on the exact-command path.
    Command(Vec<Arc<Command>>),
    /// Candidates matched by intent on the conversational path.
    Converse(Vec<Arc<ConverseCommand>>),
}

impl Candidates {
    /// Number of matched candidates.
    pub fn len(&self) -> usize {
        match self {
            Self::Command(c) => c.len(),
            Self::Converse(c) => c.len(),
        }
    }

    /// Returns `true` if no candidate matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Primary name or intent label of each candidate, in order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Command(c) => c
                .iter()
                .filter_map(|cmd| cmd.names().first().map(String::as_str))
                .collect(),
            Self::Converse(c) => c
                .iter()
                .filter_map(|cmd| cmd.intents().first().map(String::as_str))
                .collect(),
        }
    }
}

/// A type-erased gating middleware function.
pub type Middleware =
    Arc<dyn Fn(InboundMessage, Candidates) -> BoxFuture<'static, DispatchResult<bool>> + Send + Sync>;

/// Wraps an async closure as a [`Middleware`].
pub fn into_middleware<F, Fut>(f: F) -> Middleware
where
    F: Fn(InboundMessage, Candidates) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DispatchResult<bool>> + Send + 'static,
{
    Arc::new(move |msg, candidates| Box::pin(f(msg, candidates)))
}
