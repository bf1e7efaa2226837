//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for clinsync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// clinsync - clinical record entity codecs
#[derive(Parser, Debug)]
#[command(name = "clinsync")]
#[command(version, about, long_about = None)]
#[command(author = "Clinsync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "clinsync.toml", env = "CLINSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLINSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a payload file and print the result
    Decode(commands::decode::DecodeArgs),

    /// Print the representation spec for an entity kind
    Representation(commands::representation::RepresentationArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::EntityKind;

    #[test]
    fn test_cli_parse_decode() {
        let cli = Cli::parse_from(["clinsync", "decode", "cohort-data", "payload.json", "--strict"]);
        assert_eq!(cli.config, "clinsync.toml");
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.entity, EntityKind::CohortData);
                assert_eq!(args.file, "payload.json");
                assert!(args.strict);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_entity() {
        assert!(Cli::try_parse_from(["clinsync", "decode", "visit", "payload.json"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "clinsync",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "validate-config",
        ]);
        assert_eq!(cli.config, "custom.toml");
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_representation() {
        let cli = Cli::parse_from(["clinsync", "representation", "patient", "--url"]);
        match cli.command {
            Commands::Representation(args) => {
                assert_eq!(args.entity, Some(EntityKind::Patient));
                assert!(args.url);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["clinsync", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
