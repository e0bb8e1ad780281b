//! Configuration loading from file and environment

use sonata_catalog_client::{CatalogClientError, ClientConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        ClientConfig::load_from(&dir.path().join("sonata.toml"), "SONATA_TEST_MISSING").unwrap();

    assert_eq!(config, ClientConfig::default());
}

#[test]
fn file_values_override_defaults() {
    let file = toml_file(
        r#"
base_url = "https://music.example.com/player/"
catalog_url = "evening.json"
timeout_secs = 5
"#,
    );

    let config = ClientConfig::load_from(file.path(), "SONATA_TEST_FILE").unwrap();

    assert_eq!(config.base_url, "https://music.example.com/player/");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.connect_timeout_secs, 10);
    assert_eq!(
        config.resolve_catalog_url().unwrap().as_str(),
        "https://music.example.com/player/evening.json"
    );
}

#[test]
fn environment_overrides_file() {
    let file = toml_file("timeout_secs = 5\n");
    std::env::set_var("SONATA_TEST_ENV_TIMEOUT_SECS", "45");
    std::env::set_var("SONATA_TEST_ENV_BASE_URL", "http://127.0.0.1:9000/");

    let config = ClientConfig::load_from(file.path(), "SONATA_TEST_ENV");

    std::env::remove_var("SONATA_TEST_ENV_TIMEOUT_SECS");
    std::env::remove_var("SONATA_TEST_ENV_BASE_URL");

    let config = config.unwrap();
    assert_eq!(config.timeout_secs, 45);
    assert_eq!(config.base_url, "http://127.0.0.1:9000/");
}

#[test]
fn invalid_base_url_is_rejected() {
    let file = toml_file("base_url = \"not a url\"\n");

    let result = ClientConfig::load_from(file.path(), "SONATA_TEST_INVALID");

    assert!(matches!(result, Err(CatalogClientError::InvalidUrl(_))));
}

#[test]
fn wrong_type_is_config_error() {
    let file = toml_file("timeout_secs = \"soon\"\n");

    let result = ClientConfig::load_from(file.path(), "SONATA_TEST_TYPE");

    assert!(matches!(result, Err(CatalogClientError::Config(_))));
}
