//! Configuration management for clinsync.
//!
//! clinsync reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CLINSYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [codec]
//! strictness = "permissive"
//!
//! [remote]
//! base_url = "https://emr.example.org/openmrs/ws/rest/v1"
//! username = "sync_user"
//! password = "${CLINSYNC_REMOTE_PASSWORD}"
//! timeout_seconds = 30
//! page_size = 100
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! ```rust,no_run
//! use clinsync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinsync.toml")?;
//! println!("Server: {}", config.remote.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ClinsyncConfig, CodecConfig, LoggingConfig, RemoteConfig, Strictness,
};
pub use secret::{secret_string, SecretString, SecretValue};
