//! Error reporting.
//!
//! Any fault raised during a single `process` invocation is caught at the
//! dispatcher's top level, formatted by the active [`ErrorFormatter`], and the
//! resulting text is sent back to the originating conversation. Exactly one
//! formatter is active at a time; it can be replaced at any point via
//! [`Dispatcher::set_error_formatter`](crate::Dispatcher::set_error_formatter).

use std::sync::Arc;

use banter_core::InboundMessage;

use crate::error::DispatchError;

/// Maps a failed invocation to user-facing reply text.
pub type ErrorFormatter = Arc<dyn Fn(&InboundMessage, &DispatchError) -> String + Send + Sync>;

/// The default formatter: an author mention followed by the error display.
pub fn default_formatter() -> ErrorFormatter {
    Arc::new(|message, error| format!("<@{}> Error: {error}", message.author.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use banter_core::{Author, ChannelResult, Conversation};

    struct NullConversation;

    #[async_trait]
    impl Conversation for NullConversation {
        async fn send(&self, _text: &str) -> ChannelResult<()> {
            Ok(())
        }
    }

    #[test]
    fn default_formatter_mentions_author_and_error() {
        let msg = InboundMessage::new("-oof nope", Author::new("518"), Arc::new(NullConversation));
        let text = default_formatter()(
            &msg,
            &DispatchError::CommandNotFound {
                name: "nope".into(),
            },
        );
        assert_eq!(text, "<@518> Error: command not found: nope");
    }
}
