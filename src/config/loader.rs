// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CoordinatorConfig, RawCoordinatorConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// [`RawCoordinatorConfig`].
///
/// This only performs TOML deserialization; it does **not** validate. Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawCoordinatorConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawCoordinatorConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point for embedders:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks basic sanity of the fan-out lock/retry budgets.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CoordinatorConfig> {
    let raw_config = load_from_path(&path)?;
    let config = CoordinatorConfig::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Fandag.toml` in the current working
/// directory; embedders with their own discovery rules can ignore it.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Fandag.toml")
}
