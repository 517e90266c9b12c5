//! Configuration schemas.
//!
//! Configuration is layered with the `config` crate: an optional explicit
//! file, then `config/default` and `config/{env}`, then environment
//! variables prefixed with `DEPHOOK` (`DEPHOOK__SCENARIO__TOKEN_SYMBOL=...`).
//! Every field has a default, so no file is required.

pub mod logging;
pub mod scenario;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::scenario::ScenarioConfig;

use crate::error::AppError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Token DAO scenario settings.
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// `path` is an extra file layered on top of the defaults when given.
    pub fn load(path: Option<&str>, env: &str) -> Result<Self, AppError> {
        Self::load_with_vars(path, env, None)
    }

    /// Like [`AppConfig::load`], reading `DEPHOOK__*` overrides from `vars`
    /// instead of the process environment when given.
    ///
    /// Override values are kept as strings and converted per field, so
    /// amounts above `i64::MAX` come through exactly.
    pub fn load_with_vars(
        path: Option<&str>,
        env: &str,
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DEPHOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .source(vars),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml(document: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.scenario.validate()?;
        Ok(parsed)
    }
}
