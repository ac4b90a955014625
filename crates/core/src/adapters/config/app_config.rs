use config::Config;
use error_stack::ResultExt;
use thiserror::Error;

use super::sheets_config::{SpreadsheetConfig, DEFAULT_PRIV_KEY};

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "Config";
pub const ENV_PREFIX: &str = "APP";

#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
}

#[derive(Error, Debug)]
#[error("[CONFIG ERROR] Failed to load configuration from '{0}'")]
pub struct ConfigLoadError(pub String);

impl AppConfig {
    /// Loads the configuration from the file named by `CONFIG_PATH` (default `Config`).
    pub fn load() -> error_stack::Result<AppConfig, ConfigLoadError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    /// Built-in defaults, then the optional file at `config_path`, then `APP__*` variables.
    pub fn load_from(config_path: &str) -> error_stack::Result<AppConfig, ConfigLoadError> {
        Self::load_with_env(config_path, None)
    }

    /// Same as [`AppConfig::load_from`], reading the `APP__*` variables from `env` instead of the
    /// process environment when given.
    fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> error_stack::Result<AppConfig, ConfigLoadError> {
        Config::builder()
            .set_default("sheets.priv_key", DEFAULT_PRIV_KEY)
            .change_context_lazy(|| ConfigLoadError(config_path.to_string()))?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(env),
            )
            .build()
            .change_context_lazy(|| ConfigLoadError(config_path.to_string()))?
            .try_deserialize()
            .change_context_lazy(|| ConfigLoadError(config_path.to_string()))
            .attach_printable("Make sure all required fields are present in the configuration file.")
    }
}
