//! Core types for the Banter dispatch framework.
//!
//! This crate is deliberately small: it defines the shapes that the dispatcher
//! and the outside world agree on, and nothing else.
//!
//! - [`InboundMessage`] - a decoded chat message with its author and a reply
//!   capability back to the originating conversation
//! - [`Conversation`] - the "send text back" capability implemented by
//!   transports
//! - [`IntentClassifier`] - the injected NLP collaborator that maps free text
//!   to an intent label, a confidence score, and extracted entities
//!
//! Transports and classifiers live outside this workspace; anything that can
//! implement these two traits can drive the dispatcher.

mod classify;
mod error;
mod message;

pub use classify::{Classification, Entity, IntentClassifier, NO_INTENT};
pub use error::{ChannelError, ChannelResult, ClassifyError, ClassifyResult};
pub use message::{Author, Conversation, InboundMessage};
