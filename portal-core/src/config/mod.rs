use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Default settings file, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/base";

/// Environment variable prefix; `APP_API__BASE_URL` maps to `api.base_url`.
pub const ENV_PREFIX: &str = "APP";

/// Load layered settings: `.env`, then a settings file, then `APP_` variables.
///
/// An explicit file must exist. Without one, `config/base.{yaml,toml,json}` is
/// picked up when present and skipped otherwise.
pub fn load<T: DeserializeOwned>(explicit_file: Option<&Path>) -> Result<T, config::ConfigError> {
    dotenvy::dotenv().ok();

    let file_source = match explicit_file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = Cfg::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}
