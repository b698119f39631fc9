//! Configuration validation.
//!
//! A malformed dispatch configuration is a programmer/deployment error and
//! should surface at startup, not on the first message.

use super::error::{ConfigError, ConfigResult};
use super::schema::BanterConfig;

/// Validates a loaded configuration.
pub fn validate(config: &BanterConfig) -> ConfigResult<()> {
    let dispatch = &config.dispatch;

    if dispatch.prefix.is_empty() {
        return Err(ConfigError::validation("dispatch.prefix must not be empty"));
    }
    if dispatch.separator.is_empty() {
        return Err(ConfigError::validation(
            "dispatch.separator must not be empty",
        ));
    }
    if dispatch.prefix.contains(&dispatch.separator) {
        return Err(ConfigError::validation(
            "dispatch.prefix must not contain the separator",
        ));
    }

    let converse = &dispatch.converse;
    if !(0.0..=1.0).contains(&converse.min_confidence) {
        return Err(ConfigError::validation(format!(
            "dispatch.converse.min_confidence must be within [0, 1], got {}",
            converse.min_confidence
        )));
    }
    if let Some(triggers) = &converse.must_include
        && triggers.iter().any(String::is_empty)
    {
        return Err(ConfigError::validation(
            "dispatch.converse.must_include entries must not be empty",
        ));
    }
    if converse.language.is_empty() {
        return Err(ConfigError::validation(
            "dispatch.converse.language must not be empty",
        ));
    }

    Ok(())
}
