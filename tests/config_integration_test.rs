//! Integration tests for configuration loading and validation
//!
//! Every test takes `ENV_MUTEX`, since `CLINSYNC_*` overrides apply to every
//! load in the process.

use clinsync::config::{load_config, Strictness};
use clinsync::core::codec::CodecContext;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
    for var in [
        "CLINSYNC_APPLICATION_LOG_LEVEL",
        "CLINSYNC_CODEC_STRICTNESS",
        "CLINSYNC_REMOTE_BASE_URL",
        "CLINSYNC_REMOTE_USERNAME",
        "CLINSYNC_REMOTE_PASSWORD",
        "CLINSYNC_REMOTE_PAGE_SIZE",
        "CLINSYNC_LOGGING_LOCAL_ENABLED",
        "TEST_REMOTE_PASSWORD",
    ] {
        std::env::remove_var(var);
    }
    guard
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _env = lock_env();
    let file = config_file(
        r#"
[application]
log_level = "debug"

[codec]
strictness = "strict"

[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
username = "sync_user"
password = "sync_pass"
timeout_seconds = 45
proxy = "http://proxy.local:3128"
page_size = 250

[logging]
local_enabled = true
local_path = "/tmp/clinsync"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.codec.strictness, Strictness::Strict);
    assert!(CodecContext::from_config(&config.codec).is_strict());
    assert_eq!(
        config.remote.base_url,
        "https://emr.example.org/openmrs/ws/rest/v1"
    );
    assert_eq!(config.remote.username.as_deref(), Some("sync_user"));
    assert_eq!(
        config.remote.password.as_ref().unwrap().expose_secret(),
        "sync_pass"
    );
    assert_eq!(config.remote.timeout_seconds, 45);
    assert_eq!(config.remote.proxy.as_deref(), Some("http://proxy.local:3128"));
    assert_eq!(config.remote.page_size, 250);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _env = lock_env();
    let file = config_file(
        r#"
[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.codec.strictness, Strictness::Permissive);
    assert!(config.remote.username.is_none());
    assert!(config.remote.password.is_none());
    assert_eq!(config.remote.timeout_seconds, 30);
    assert_eq!(config.remote.page_size, 100);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_env_var_substitution() {
    let _env = lock_env();
    std::env::set_var("TEST_REMOTE_PASSWORD", "from-env");
    let file = config_file(
        r#"
[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
username = "sync_user"
password = "${TEST_REMOTE_PASSWORD}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config.remote.password.as_ref().unwrap().expose_secret(),
        "from-env"
    );
    std::env::remove_var("TEST_REMOTE_PASSWORD");
}

#[test]
fn test_missing_substitution_variable_is_reported() {
    let _env = lock_env();
    let file = config_file(
        r#"
[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
username = "sync_user"
password = "${TEST_REMOTE_PASSWORD}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_REMOTE_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _env = lock_env();
    std::env::set_var("CLINSYNC_CODEC_STRICTNESS", "strict");
    std::env::set_var("CLINSYNC_REMOTE_PAGE_SIZE", "20");
    std::env::set_var("CLINSYNC_APPLICATION_LOG_LEVEL", "trace");
    let file = config_file(
        r#"
[application]
log_level = "info"

[remote]
base_url = "https://emr.example.org/openmrs/ws/rest/v1"
page_size = 100
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.codec.strictness, Strictness::Strict);
    assert_eq!(config.remote.page_size, 20);
    assert_eq!(config.application.log_level, "trace");

    std::env::remove_var("CLINSYNC_CODEC_STRICTNESS");
    std::env::remove_var("CLINSYNC_REMOTE_PAGE_SIZE");
    std::env::remove_var("CLINSYNC_APPLICATION_LOG_LEVEL");
}

#[test]
fn test_invalid_config_validation() {
    let _env = lock_env();
    let cases = [
        (
            "[remote]\nbase_url = \"not a url\"\n",
            "remote.base_url",
        ),
        (
            "[remote]\nbase_url = \"https://emr.example.org\"\npage_size = 0\n",
            "page_size",
        ),
        (
            "[remote]\nbase_url = \"https://emr.example.org\"\nusername = \"only_user\"\n",
            "together",
        ),
        (
            "[application]\nlog_level = \"loud\"\n\n[remote]\nbase_url = \"https://emr.example.org\"\n",
            "log_level",
        ),
        (
            "[codec]\nstrictness = \"lenient\"\n\n[remote]\nbase_url = \"https://emr.example.org\"\n",
            "TOML",
        ),
    ];

    for (contents, expected) in cases {
        let file = config_file(contents);
        let err = load_config(file.path()).unwrap_err().to_string();
        assert!(err.contains(expected), "{err} should mention {expected}");
    }
}
