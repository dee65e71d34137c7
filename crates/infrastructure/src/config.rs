//! Configuration loading.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `REQCHECK_`-prefixed environment variables. Nested keys use a double
//! underscore, e.g. `REQCHECK_DEFAULT_HEADERS__AUTHORIZATION`. Environment
//! keys are lowercased and cannot spell a hyphen, so a header such as
//! `x-api-key` has to come from the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use config::{Config, Environment, File, FileFormat};
use reqcheck_application::{HarnessConfig, HarnessError, HarnessResult};
use tracing::debug;

/// File read when no explicit path is given and it exists.
pub const DEFAULT_CONFIG_FILE: &str = "reqcheck.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "REQCHECK_CONFIG";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "REQCHECK";

static GLOBAL: OnceLock<HarnessConfig> = OnceLock::new();

/// Loads and validates the harness configuration.
///
/// With `path`, that file must exist. Otherwise the file named by
/// `REQCHECK_CONFIG` is required, and failing that `reqcheck.toml` is read
/// if present.
///
/// # Errors
///
/// Returns `HarnessError::Config` if a source cannot be read or the merged
/// settings are invalid.
pub fn load_config(path: Option<&Path>) -> HarnessResult<HarnessConfig> {
    load(path, None)
}

/// The process-wide configuration, loaded on first use.
///
/// # Errors
///
/// Returns `HarnessError::Config` if the first load fails; a later call
/// retries.
pub fn global_config() -> HarnessResult<&'static HarnessConfig> {
    if let Some(config) = GLOBAL.get() {
        return Ok(config);
    }
    let config = load_config(None)?;
    Ok(GLOBAL.get_or_init(|| config))
}

fn load(path: Option<&Path>, env: Option<HashMap<String, String>>) -> HarnessResult<HarnessConfig> {
    let (file, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => explicit_path(env.as_ref())
            .map_or_else(|| (PathBuf::from(DEFAULT_CONFIG_FILE), false), |p| (p, true)),
    };
    debug!(file = %file.display(), required, "loading configuration");

    let config: HarnessConfig = Config::builder()
        .add_source(File::from(file).format(FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .and_then(Config::try_deserialize)
        .map_err(|e| HarnessError::Config(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

fn explicit_path(env: Option<&HashMap<String, String>>) -> Option<PathBuf> {
    let value = match env {
        Some(vars) => vars.get(CONFIG_PATH_VAR).cloned(),
        None => std::env::var(CONFIG_PATH_VAR).ok(),
    };
    value.filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}
