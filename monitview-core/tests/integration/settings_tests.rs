//! Settings files on disk

use std::io::Write;
use std::time::Duration;

use monitview_core::{ConfigError, load_settings};
use secrecy::ExposeSecret;
use tempfile::NamedTempFile;

#[test]
fn test_load_settings_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
host = "monit.example.org"
port = 2813
username = "ops"
password = "s3cret"
timeout_secs = 0
case_folding = false
"#
    )
    .unwrap();

    let settings = load_settings(file.path()).unwrap();
    assert_eq!(settings.host, "monit.example.org");
    assert!(!settings.parse_options().case_folding);

    let params = settings.to_params().unwrap();
    assert_eq!(params.port(), 2813);
    assert_eq!(params.username(), "ops");
    assert_eq!(params.password().expose_secret(), "s3cret");
    assert_eq!(params.timeout(), Duration::from_secs(1));
    assert_eq!(params.path(), "/_status?format=xml");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_settings(&dir.path().join("monitview.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_invalid_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();
    assert!(matches!(
        load_settings(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_password_is_never_written_back() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "password = \"s3cret\"").unwrap();
    let settings = load_settings(file.path()).unwrap();

    let rendered = toml::to_string(&settings).unwrap();
    assert!(!rendered.contains("s3cret"));
    assert!(!format!("{settings:?}").contains("s3cret"));
}
