//! Representation command implementation
//!
//! Prints the representation spec requested for an entity kind, and
//! optionally the download URL built from it.

use crate::adapters::{DownloadRequest, RemoteEndpoint};
use crate::config::load_config;
use crate::core::codec::EntityKind;
use clap::Args;

/// Arguments for the representation command
#[derive(Args, Debug)]
pub struct RepresentationArgs {
    /// Entity kind, e.g. `patient` or `cohort_data`; omit to list every kind
    pub entity: Option<EntityKind>,

    /// Also print the download URL, using the remote server from the
    /// configuration file
    #[arg(long)]
    pub url: bool,
}

impl RepresentationArgs {
    /// Execute the representation command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(kind) = self.entity else {
            for kind in EntityKind::ALL {
                println!("{:<24} {}", kind.name(), kind.resource().unwrap_or("-"));
            }
            return Ok(0);
        };

        let representation = kind.parsed_representation()?;
        println!("{}", representation.as_query_value());

        if self.url {
            let config = match load_config(config_path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(2);
                }
            };
            let endpoint = RemoteEndpoint::new(config.remote)?;
            let request = match DownloadRequest::for_kind(kind) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(1);
                }
            };
            println!("{}", endpoint.download_url(&request)?);
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_kinds() {
        let args = RepresentationArgs {
            entity: None,
            url: false,
        };
        assert_eq!(args.execute("unused.toml").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_url_without_config_is_a_configuration_error() {
        let args = RepresentationArgs {
            entity: Some(EntityKind::Patient),
            url: true,
        };
        assert_eq!(args.execute("/nonexistent/clinsync.toml").await.unwrap(), 2);
    }
}
