//! Validate config command implementation

use crate::adapters::RemoteEndpoint;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let endpoint = match RemoteEndpoint::new(config.remote.clone()) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                println!("❌ Remote endpoint is unusable");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Codec Strictness: {}", config.codec.strictness);
        println!("  Remote Server: {}", endpoint.base_url());
        println!(
            "  Authentication: {}",
            endpoint
                .credentials()
                .map(|(username, _)| format!("basic ({username})"))
                .unwrap_or_else(|| "none".to_string())
        );
        println!("  Timeout: {}s", endpoint.timeout().as_secs());
        println!("  Page Size: {}", endpoint.page_size());
        if let Some(proxy) = endpoint.proxy() {
            println!("  Proxy: {proxy}");
        }
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/clinsync.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[remote]\nbase_url = \"https://emr.example.org/openmrs/ws/rest/v1\""
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), 0);
    }
}
