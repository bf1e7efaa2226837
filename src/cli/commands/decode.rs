//! Decode command implementation
//!
//! Decodes a payload file with one entity codec and prints the decoded
//! record next to the codec's re-encoding. Useful for checking what a server
//! response turns into on the device.

use crate::config::Strictness;
use crate::core::codec::{CodecContext, EntityKind};
use crate::logging::RecordingSink;
use clap::Args;
use std::fs;
use std::io::Read;
use std::sync::Arc;

/// Exit code for payloads that fail to decode
pub const DECODE_FAILED: i32 = 3;

/// Arguments for the decode command
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Entity kind, e.g. `encounter` or `cohort_data`
    pub entity: EntityKind,

    /// Payload file; `-` reads standard input
    pub file: String,

    /// Fail on malformed dates and unresolved cohort payloads
    #[arg(long)]
    pub strict: bool,

    /// Print only the re-encoded payload
    #[arg(long)]
    pub encoded_only: bool,
}

impl DecodeArgs {
    /// Execute the decode command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let raw = self.read_payload()?;
        tracing::debug!(entity = %self.entity, bytes = raw.len(), "Decoding payload");

        let strictness = if self.strict {
            Strictness::Strict
        } else {
            Strictness::Permissive
        };
        let sink = Arc::new(RecordingSink::new());
        let context = CodecContext::new(strictness).with_sink(sink.clone());

        let transcoded = match self.entity.transcode(&context, &raw) {
            Ok(transcoded) => transcoded,
            Err(e) => {
                crate::log_codec_error!(&e, "decode command");
                eprintln!("❌ {e}");
                return Ok(DECODE_FAILED);
            }
        };

        for diagnostic in sink.diagnostics() {
            eprintln!(
                "⚠️  {} {}: {}",
                diagnostic.kind,
                diagnostic.path.as_deref().unwrap_or(diagnostic.entity),
                diagnostic.message
            );
        }

        let output = if self.encoded_only {
            serde_json::to_string_pretty(&transcoded.encoded)?
        } else {
            serde_json::to_string_pretty(&transcoded)?
        };
        println!("{output}");
        Ok(0)
    }

    fn read_payload(&self) -> anyhow::Result<String> {
        if self.file == "-" {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            return Ok(raw);
        }
        fs::read_to_string(&self.file)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", self.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(entity: EntityKind, file: &NamedTempFile, strict: bool) -> DecodeArgs {
        DecodeArgs {
            entity,
            file: file.path().to_string_lossy().to_string(),
            strict,
            encoded_only: false,
        }
    }

    fn payload(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[tokio::test]
    async fn test_decode_cohort() {
        let file = payload(r#"{"uuid":"u1","name":"Flu Patients","dynamic":false}"#);
        assert_eq!(
            args(EntityKind::Cohort, &file, false).execute().await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_decode_failure_exit_code() {
        let file = payload(r#"{"name":"no uuid"}"#);
        assert_eq!(
            args(EntityKind::Cohort, &file, false).execute().await.unwrap(),
            DECODE_FAILED
        );
    }

    #[tokio::test]
    async fn test_strict_unresolved_cohort_data() {
        let file = payload(r#"{"foo":1}"#);
        assert_eq!(
            args(EntityKind::CohortData, &file, false)
                .execute()
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            args(EntityKind::CohortData, &file, true)
                .execute()
                .await
                .unwrap(),
            DECODE_FAILED
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let args = DecodeArgs {
            entity: EntityKind::Cohort,
            file: "/nonexistent/payload.json".to_string(),
            strict: false,
            encoded_only: false,
        };
        assert!(args.execute().await.is_err());
    }
}
