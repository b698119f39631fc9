//! Configuration loading and validation.

mod error;
mod loader;
mod schema;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{BanterConfig, LogFormat, LogLevel, LoggingConfig};
pub use validation::validate;
