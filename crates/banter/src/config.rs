//! Dispatch configuration.
//!
//! [`DispatchConfig`] is what setup code hands to the dispatcher: the prefix
//! that marks a message as an exact-command invocation, the field separator
//! used for tokenizing, and the conversational-routing knobs. It derives
//! serde traits so a runtime configuration layer can embed it directly.

use serde::{Deserialize, Serialize};

/// Options for the conversational (intent-match) path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverseConfig {
    /// Minimum classifier confidence for a match to be dispatched.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Trigger substrings gating classifier invocation.
    ///
    /// When unset, every non-prefixed message is eligible for conversational
    /// routing. When set, a message is eligible only if it contains at least
    /// one trigger substring, case-insensitively; ineligible messages never
    /// reach the classifier.
    #[serde(default)]
    pub must_include: Option<Vec<String>>,

    /// Language code passed to the classifier.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ConverseConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            must_include: None,
            language: default_language(),
        }
    }
}

impl ConverseConfig {
    /// Returns whether `text` is eligible for conversational routing.
    pub fn is_eligible(&self, text: &str) -> bool {
        match &self.must_include {
            None => true,
            Some(triggers) => {
                let lowered = text.to_lowercase();
                triggers
                    .iter()
                    .any(|t| lowered.contains(&t.to_lowercase()))
            }
        }
    }
}

fn default_min_confidence() -> f64 {
    0.5
}

fn default_language() -> String {
    "en".to_string()
}

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// The leading token that marks an exact-command invocation.
    pub prefix: String,

    /// Field separator used to tokenize message text.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Conversational-routing options.
    #[serde(default)]
    pub converse: ConverseConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new("!")
    }
}

impl DispatchConfig {
    /// Creates a configuration with the given prefix and default options.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: default_separator(),
            converse: ConverseConfig::default(),
        }
    }

    /// Sets the field separator (default: a single space).
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the minimum classifier confidence (default: 0.5).
    pub fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.converse.min_confidence = min_confidence;
        self
    }

    /// Sets the trigger substrings gating the conversational path.
    pub fn must_include<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.converse.must_include = Some(triggers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the classifier language code (default: `"en"`).
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.converse.language = language.into();
        self
    }
}

fn default_separator() -> String {
    " ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DispatchConfig::new("-oof");
        assert_eq!(config.prefix, "-oof");
        assert_eq!(config.separator, " ");
        assert_eq!(config.converse.min_confidence, 0.5);
        assert!(config.converse.must_include.is_none());
        assert_eq!(config.converse.language, "en");
    }

    #[test]
    fn eligibility_without_triggers_is_universal() {
        let config = ConverseConfig::default();
        assert!(config.is_eligible("anything at all"));
        assert!(config.is_eligible(""));
    }

    #[test]
    fn eligibility_with_triggers_is_case_insensitive() {
        let config = DispatchConfig::new("!").must_include(["help"]).converse;
        assert!(config.is_eligible("I need HELP please"));
        assert!(config.is_eligible("helpful"));
        assert!(!config.is_eligible("good morning"));
    }

    #[test]
    fn deserializes_with_defaults_filled_in() {
        let config: DispatchConfig = serde_json::from_str(r#"{"prefix": "-oof"}"#).unwrap();
        assert_eq!(config.separator, " ");
        assert_eq!(config.converse.min_confidence, 0.5);
    }
}
