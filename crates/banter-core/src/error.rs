//! Error types for the collaborator traits.
//!
//! Dispatch-level errors live in the `banter` crate; this module only covers
//! faults raised by the injected collaborators themselves.

use thiserror::Error;

/// Errors raised by a [`Conversation`](crate::Conversation) when sending text.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// The underlying transport refused or failed the send.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// The conversation is no longer reachable.
    #[error("conversation closed: {reason}")]
    Closed {
        /// Reason for closure.
        reason: String,
    },
}

/// Errors raised by an [`IntentClassifier`](crate::IntentClassifier).
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// `classify` was called before `load`, or after `unload`.
    #[error("classifier model not loaded")]
    ModelNotLoaded,

    /// The classifier backend failed.
    #[error("classifier backend error: {0}")]
    Backend(String),
}

/// Result type for conversation operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Result type for classifier operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;
