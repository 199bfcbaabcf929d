//! Configuration loading for the introspection engine
//!
//! This module provides configuration loading from YAML files with
//! environment variable substitution support.

use metamodel_core::{IntrospectConfig, MetamodelError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}").ok());

/// Load configuration from a `YAML` file with environment variable substitution
///
/// # Errors
///
/// Returns `MetamodelError::IoError` if the file cannot be read
/// Returns `MetamodelError::ConfigError` if the YAML cannot be parsed
pub fn load_config<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    load_config_str(&contents)
}

/// Parse configuration text with environment variable substitution
///
/// # Errors
///
/// Returns `MetamodelError::ConfigError` if the YAML cannot be parsed
pub fn load_config_str<T: for<'de> Deserialize<'de>>(contents: &str) -> Result<T> {
    let substituted = substitute_env_vars(contents);
    serde_yaml::from_str(&substituted)
        .map_err(|e| MetamodelError::config(format!("Failed to parse YAML config: {e}")))
}

/// Load and check an [`IntrospectConfig`]
///
/// # Errors
///
/// Returns the errors of [`load_config`], or `MetamodelError::ConfigError`
/// if a value is out of range
pub fn load_introspect_config(path: &Path) -> Result<IntrospectConfig> {
    let config: IntrospectConfig = load_config(path)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Substitute environment variables in the format `${VAR:-default}`
///
/// Unset variables without a default become empty.
#[must_use]
pub fn substitute_env_vars(content: &str) -> String {
    let Some(re) = ENV_VAR.as_ref() else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        let default_value = caps.get(3).map_or("", |m| m.as_str());

        env::var(var_name).unwrap_or_else(|_| default_value.to_string())
    })
    .into_owned()
}
