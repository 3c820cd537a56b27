//! Configuration loading and validation tests.
//!
//! Tests TOML parsing, environment variable overrides, partial configs, and validation.

use authmap_core::config::AuthmapConfig;
use std::env;

#[test]
fn test_parse_full_config() {
    // Given: A complete TOML config
    let toml_str = r#"
[general]
log_level = "debug"
log_format = "pretty"

[influx]
url = "http://localhost:8086"
token = "secret-token"
org = "ops"
bucket = "authlogs"

[geolite]
path = "/opt/geoip/GeoLite2-City.mmdb"

[auth]
path = "/var/log/secure"
wait_length_secs = 10
poll_interval_ms = 250
max_line_length = 8192

[metrics]
enabled = true
listen_addr = "0.0.0.0"
port = 9700
"#;

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should succeed
    assert!(result.is_ok(), "full config should parse successfully");
    let config = result.expect("config should parse");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "pretty");

    assert_eq!(config.influx.url, "http://localhost:8086");
    assert_eq!(config.influx.token, "secret-token");
    assert_eq!(config.influx.org, "ops");
    assert_eq!(config.influx.bucket, "authlogs");

    assert_eq!(config.geolite.path, "/opt/geoip/GeoLite2-City.mmdb");

    assert_eq!(config.auth.path, "/var/log/secure");
    assert_eq!(config.auth.wait_length_secs, 10);
    assert_eq!(config.auth.poll_interval_ms, 250);
    assert_eq!(config.auth.max_line_length, 8192);

    assert!(config.metrics.enabled);
    assert_eq!(config.metrics.port, 9700);
}

#[test]
fn test_parse_partial_config_with_defaults() {
    // Given: A partial config (only auth section)
    let toml_str = r#"
[auth]
wait_length_secs = 30
"#;

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should use defaults for missing sections
    assert!(result.is_ok(), "partial config should parse with defaults");
    let config = result.expect("config should parse");

    assert_eq!(config.auth.wait_length_secs, 30);
    assert_eq!(config.auth.path, "/var/log/auth.log");
    assert_eq!(config.influx.url, "http://influxdb:8086");
    assert_eq!(config.influx.bucket, "db0");
    assert_eq!(config.geolite.path, "/etc/authmap/GeoLite2-City.mmdb");
    assert!(!config.metrics.enabled, "metrics should be disabled by default");
}

#[test]
fn test_parse_empty_config() {
    // Given: An empty config string
    let toml_str = "";

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should succeed with all defaults and validate cleanly
    assert!(result.is_ok(), "empty config should parse successfully");
    let config = result.expect("config should parse");
    assert!(config.validate().is_ok(), "default config should be valid");
}

#[test]
fn test_parse_malformed_toml_fails() {
    // Given: Malformed TOML
    let toml_str = r#"
[general
log_level = "info"
"#;

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should fail
    assert!(result.is_err(), "malformed TOML should fail to parse");
}

#[test]
fn test_parse_invalid_field_type_fails() {
    // Given: TOML with invalid field type
    let toml_str = r#"
[auth]
wait_length_secs = "five seconds"
"#;

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should fail
    assert!(result.is_err(), "invalid field type should fail to parse");
}

#[test]
#[serial_test::serial]
fn test_env_override_influx_url() {
    // Given: A base config and environment variable
    let toml_str = r#"
[influx]
url = "http://influxdb:8086"
"#;

    // SAFETY: Test isolation - we set and clean up env vars
    unsafe {
        env::set_var("AUTHMAP_INFLUX_URL", "http://metrics.internal:8086");
    }

    // When: Loading config with env overrides
    let mut config = AuthmapConfig::parse(toml_str).expect("should parse");
    config.apply_env_overrides();

    // Then: Environment variable should override TOML value
    assert_eq!(
        config.influx.url, "http://metrics.internal:8086",
        "env var should override TOML value"
    );

    // Cleanup
    // SAFETY: Test cleanup
    unsafe {
        env::remove_var("AUTHMAP_INFLUX_URL");
    }
}

#[test]
#[serial_test::serial]
fn test_env_override_takes_precedence_over_empty_toml() {
    // Given: Empty config and environment variable
    let toml_str = "";

    // SAFETY: Test isolation
    unsafe {
        env::set_var("AUTHMAP_AUTH_WAIT_LENGTH_SECS", "42");
    }

    // When: Loading with env overrides
    let mut config = AuthmapConfig::parse(toml_str).expect("should parse");
    config.apply_env_overrides();

    // Then: Environment variable should set value
    assert_eq!(
        config.auth.wait_length_secs, 42,
        "env var should work even with empty TOML"
    );

    // Cleanup
    // SAFETY: Test cleanup
    unsafe {
        env::remove_var("AUTHMAP_AUTH_WAIT_LENGTH_SECS");
    }
}

#[test]
#[serial_test::serial]
fn test_env_override_no_env_var_keeps_toml() {
    // Given: Config without corresponding env var
    let toml_str = r#"
[influx]
bucket = "authlogs"
"#;

    // When: Applying env overrides (no env vars set)
    let mut config = AuthmapConfig::parse(toml_str).expect("should parse");
    config.apply_env_overrides();

    // Then: TOML value should remain
    assert_eq!(
        config.influx.bucket, "authlogs",
        "TOML value should remain when no env var is set"
    );
}

#[test]
fn test_validation_rejects_relative_auth_path() {
    // Given: A config with a relative auth log path
    let config = AuthmapConfig::parse(
        r#"
[auth]
path = "logs/auth.log"
"#,
    )
    .expect("should parse");

    // When: Validating config
    let result = config.validate();

    // Then: Should fail
    assert!(result.is_err(), "relative auth path should fail validation");
}

#[test]
fn test_validation_rejects_unknown_log_format() {
    // Given: A config with an unsupported log format
    let config = AuthmapConfig::parse(
        r#"
[general]
log_format = "xml"
"#,
    )
    .expect("should parse");

    // When: Validating config
    let result = config.validate();

    // Then: Should fail
    assert!(result.is_err(), "unknown log format should fail validation");
}

#[test]
fn test_parse_special_characters_in_paths() {
    // Given: Config with special characters
    let toml_str = r#"
[geolite]
path = "/opt/geoip@2024/GeoLite2-City.mmdb"

[influx]
url = "http://influxdb.internal:8086"
"#;

    // When: Parsing config
    let result = AuthmapConfig::parse(toml_str);

    // Then: Should preserve special characters
    assert!(result.is_ok(), "config with special chars should parse");
    let config = result.expect("config should parse");
    assert!(config.geolite.path.contains('@'));
}
