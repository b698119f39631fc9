//! Inbound message model.
//!
//! The dispatcher only needs three things from a platform message: its text,
//! who wrote it, and a way to send text back to where it came from. Everything
//! platform-specific (message ids, channels, attachments) stays in the
//! transport that produced the message.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ChannelResult;

/// The author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Platform-scoped identifier, used by the default error formatter to
    /// build a mention.
    pub id: String,

    /// Display name, if the platform provides one.
    pub name: Option<String>,

    /// Whether the author is an automated participant.
    ///
    /// Messages from automated participants are discarded by the dispatcher
    /// before any handler runs, to avoid feedback loops between bots.
    pub is_bot: bool,
}

impl Author {
    /// Creates a human author with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_bot: false,
        }
    }

    /// Creates an automated-participant author with the given id.
    pub fn bot(id: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id)
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The reply capability of an originating conversation.
///
/// Implemented by transports. The dispatcher uses it for exactly one thing:
/// delivering formatted error text (and whatever handlers choose to send)
/// back to the conversation the message arrived from.
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Sends text back to this conversation.
    async fn send(&self, text: &str) -> ChannelResult<()>;
}

/// A decoded inbound chat message.
///
/// Cheap to clone: the reply capability is shared behind an `Arc`.
#[derive(Clone)]
pub struct InboundMessage {
    /// The raw text content of the message.
    pub text: String,

    /// The message author.
    pub author: Author,

    /// Reply capability back to the originating conversation.
    channel: Arc<dyn Conversation>,
}

impl InboundMessage {
    /// Creates a new inbound message.
    pub fn new(text: impl Into<String>, author: Author, channel: Arc<dyn Conversation>) -> Self {
        Self {
            text: text.into(),
            author,
            channel,
        }
    }

    /// Sends text back to the conversation this message arrived from.
    pub async fn reply(&self, text: &str) -> ChannelResult<()> {
        self.channel.send(text).await
    }

    /// Returns the shared reply capability.
    pub fn channel(&self) -> Arc<dyn Conversation> {
        Arc::clone(&self.channel)
    }
}

impl std::fmt::Debug for InboundMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundMessage")
            .field("text", &self.text)
            .field("author", &self.author)
            .finish_non_exhaustive()
    }
}
