//! Bus configuration.
//!
//! Loaded from environment variables prefixed `UOW_BUS_`, or from any
//! source the `config` crate can build.

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Environment variable prefix for [`BusConfig::from_env`].
pub const ENV_PREFIX: &str = "UOW_BUS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Upper bound on messages processed by one `handle` call, cascade
    /// included. Unset means unbounded.
    pub max_messages: Option<usize>,
}

impl BusConfig {
    /// Load from `UOW_BUS_*` variables, e.g. `UOW_BUS_MAX_MESSAGES=1000`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_source(source)
    }

    pub fn from_source(source: Config) -> Result<Self, ConfigError> {
        source.try_deserialize()
    }

    pub fn with_max_messages(mut self, limit: usize) -> Self {
        self.max_messages = Some(limit);
        self
    }
}
