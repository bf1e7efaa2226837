//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "clinsync.toml")]
    pub output: String,

    /// Include comments explaining each setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set remote.base_url to your server's REST endpoint");
                println!("  2. Put CLINSYNC_REMOTE_USERNAME and CLINSYNC_REMOTE_PASSWORD in .env");
                println!("  3. Validate configuration: clinsync validate-config");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# clinsync configuration

[application]
log_level = "info"

[codec]
strictness = "permissive"

[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
username = "${CLINSYNC_REMOTE_USERNAME}"
password = "${CLINSYNC_REMOTE_PASSWORD}"
timeout_seconds = 30
page_size = 100

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# clinsync configuration
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any key can also be overridden with CLINSYNC_<SECTION>_<KEY>,
# e.g. CLINSYNC_CODEC_STRICTNESS=strict.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[codec]
# permissive: unparseable dates become absent values and unknown cohort
#             payloads decode as empty, both reported as diagnostics
# strict:     both are decode errors
strictness = "permissive"

[remote]
# Base URL of the REST API; resources are resolved relative to it
base_url = "https://emr.example.org/openmrs/ws/rest/v1"

# Basic authentication, set both or neither
username = "${CLINSYNC_REMOTE_USERNAME}"
password = "${CLINSYNC_REMOTE_PASSWORD}"

# Request timeout in seconds
timeout_seconds = 30

# Optional HTTP proxy
# proxy = "http://proxy.local:3128"

# Entities per page for list downloads (1-1000)
page_size = 100

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let content = content
                .replace("${CLINSYNC_REMOTE_USERNAME}", "sync_user")
                .replace("${CLINSYNC_REMOTE_PASSWORD}", "sync_pass");
            let config = parse_config(&content).unwrap();
            assert_eq!(config.remote.page_size, 100);
            assert!(config.remote.password.is_some());
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("clinsync.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("clinsync.toml");

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[codec]"));
    }
}
