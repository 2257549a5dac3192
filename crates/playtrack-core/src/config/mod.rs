//! Configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so an empty file is valid.

pub mod framework;
pub mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::framework::FrameworkConfig;
use self::logging::LoggingConfig;

use crate::error::{ErrorKind, PlaytrackError};

/// Prefix for environment variable overrides (`PLAYTRACK__FRAMEWORK__MAX_RECORDED_EVENTS`).
const ENV_PREFIX: &str = "PLAYTRACK";

/// Root configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine instance settings.
    #[serde(default)]
    pub framework: FrameworkConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PLAYTRACK__`.
    pub fn load(env: &str) -> Result<Self, PlaytrackError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(environment_source())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a single explicit file, still honouring
    /// environment variable overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, PlaytrackError> {
        let path = path.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(environment_source())
            .build()
            .map_err(|e| {
                PlaytrackError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to read config '{}'", path.display()),
                    e,
                )
            })?;

        Ok(config.try_deserialize()?)
    }
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
