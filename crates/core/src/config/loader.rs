use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming a config file to load when none is passed explicitly.
pub const CONFIG_PATH_ENV: &str = "MKV2MP4_CONFIG";

const ENV_PREFIX: &str = "MKV2MP4_";

fn env_overrides() -> Env {
    // `__` separates nesting levels so keys like `ffmpeg_path` survive intact.
    Env::prefixed(ENV_PREFIX)
        .filter(|key| !key.as_str().eq_ignore_ascii_case("config"))
        .split("__")
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from an optional file.
///
/// An explicit path must exist. Without one, the file named by `MKV2MP4_CONFIG`
/// is used if set; otherwise built-in defaults plus environment overrides.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(&PathBuf::from(env_path));
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
