//! Runtime layer for the Banter dispatch framework.
//!
//! Bundles the ambient concerns a deployed bot needs around the dispatch
//! core:
//!
//! - [`config`] - layered configuration loading (TOML files, `BANTER_*`
//!   environment variables, programmatic overrides) with validation
//! - [`logging`] - `tracing`-based logging setup driven by that configuration
//!
//! ```rust,ignore
//! use banter::Dispatcher;
//! use banter_runtime::{config::ConfigLoader, logging};
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! let dispatcher = Dispatcher::new(config.dispatch.clone());
//! ```

pub mod config;
pub mod logging;

pub use config::{BanterConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use logging::LoggingBuilder;
