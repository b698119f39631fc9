//! The NLP classifier collaborator.
//!
//! Classification itself (training, model files, scoring) is out of scope for
//! this workspace. The dispatcher only needs an opaque capability: given text,
//! return a best-guess intent label, a confidence score, and any extracted
//! entities. [`IntentClassifier`] is that capability, with an explicit
//! lifecycle instead of a process-wide singleton.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClassifyResult;

/// Sentinel intent label meaning "no matching intent".
///
/// A classification carrying this label must never reach a conversational
/// handler.
pub const NO_INTENT: &str = "None";

/// An entity extracted from a message by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name (e.g. "city", "date").
    pub name: String,

    /// Extracted value, in whatever shape the classifier backend produces.
    pub value: Value,
}

impl Entity {
    /// Creates a new entity.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The result of classifying a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Best-guess intent label, or [`NO_INTENT`].
    pub intent: String,

    /// Classifier-reported confidence in `[0, 1]`.
    pub score: f64,

    /// Entities extracted from the text.
    pub entities: Vec<Entity>,
}

impl Classification {
    /// Creates a classification with no entities.
    pub fn new(intent: impl Into<String>, score: f64) -> Self {
        Self {
            intent: intent.into(),
            score,
            entities: Vec::new(),
        }
    }

    /// Creates the "no matching intent" classification.
    pub fn none() -> Self {
        Self::new(NO_INTENT, 0.0)
    }

    /// Attaches extracted entities.
    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    /// Returns `true` if this classification carries the sentinel
    /// "no matching intent" label.
    pub fn is_none(&self) -> bool {
        self.intent == NO_INTENT
    }
}

/// The injected NLP collaborator.
///
/// Implementations wrap whatever backend actually scores intents. The
/// dispatcher calls [`classify`](IntentClassifier::classify) once per eligible
/// non-prefixed message; `load`/`unload` bracket the backend's lifetime and
/// default to no-ops for stateless implementations.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Loads the underlying model. Called once before dispatch starts.
    async fn load(&self) -> ClassifyResult<()> {
        Ok(())
    }

    /// Classifies `text` under the given language code (e.g. `"en"`).
    async fn classify(&self, language: &str, text: &str) -> ClassifyResult<Classification>;

    /// Releases the underlying model.
    async fn unload(&self) -> ClassifyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_detection() {
        assert!(Classification::none().is_none());
        assert!(Classification::new("None", 0.9).is_none());
        assert!(!Classification::new("greet", 0.9).is_none());
    }

    #[test]
    fn classification_round_trips_through_json() {
        let c = Classification::new("greet", 0.75)
            .with_entities(vec![Entity::new("name", "world")]);
        let json = serde_json::to_string(&c).unwrap();
        let back: Classification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
