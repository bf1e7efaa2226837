//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ClinsyncConfig;
use super::secret::secret_string;
use crate::domain::errors::ClinsyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ClinsyncConfig
/// 4. Applies environment variable overrides (CLINSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, the TOML is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use clinsync::config::loader::load_config;
///
/// let config = load_config("clinsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClinsyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClinsyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ClinsyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Applies the same substitution, overrides and validation as [`load_config`].
pub fn parse_config(contents: &str) -> Result<ClinsyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ClinsyncConfig = toml::from_str(&contents)
        .map_err(|e| ClinsyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ClinsyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ClinsyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ClinsyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the CLINSYNC_* prefix
///
/// Variables follow the pattern `CLINSYNC_<SECTION>_<KEY>`, for example
/// `CLINSYNC_REMOTE_BASE_URL` or `CLINSYNC_CODEC_STRICTNESS`.
fn apply_env_overrides(config: &mut ClinsyncConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CLINSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CLINSYNC_CODEC_STRICTNESS") {
        config.codec.strictness = val.parse().map_err(ClinsyncError::Configuration)?;
    }

    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_BASE_URL") {
        config.remote.base_url = val;
    }
    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_USERNAME") {
        config.remote.username = Some(val);
    }
    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_PASSWORD") {
        config.remote.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.remote.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_PROXY") {
        config.remote.proxy = Some(val);
    }
    if let Ok(val) = std::env::var("CLINSYNC_REMOTE_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.remote.page_size = size;
        }
    }

    if let Ok(val) = std::env::var("CLINSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
