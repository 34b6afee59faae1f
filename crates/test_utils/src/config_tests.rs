use super::*;
use std::collections::HashMap;

use secrecy::ExposeSecret;
use serial_test::serial;

fn config_from(vars: &[(&str, &str)]) -> Result<HarnessConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    HarnessConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_without_variables() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.api_path, "/api");
    assert_eq!(config.api_version, None);
    assert_eq!(config.store_api_path, "/store-api");
    assert_eq!(config.username, "admin");
    assert_eq!(config.password.expose_secret(), "shopware");
    assert_eq!(config.min_token_lifetime, 60);
    assert_eq!(config.locale, "en-GB");
    assert_eq!(config.sales_channel_name, "Storefront");
    assert!(!config.local_usage);
    assert_eq!(config.cleanup_port, 8005);
    assert_eq!(config.fixtures_dir, None);
}

#[test]
fn test_short_credential_keys_are_fallbacks() {
    let config = config_from(&[("E2E_USER", "maintainer"), ("E2E_PASS", "secret")]).unwrap();

    assert_eq!(config.username, "maintainer");
    assert_eq!(config.password.expose_secret(), "secret");
}

#[test]
fn test_long_credential_keys_win() {
    let config = config_from(&[
        ("E2E_USER", "maintainer"),
        ("E2E_USERNAME", "owner"),
        ("E2E_PASS", "secret"),
        ("E2E_PASSWORD", "other"),
    ])
    .unwrap();

    assert_eq!(config.username, "owner");
    assert_eq!(config.password.expose_secret(), "other");
}

#[test]
fn test_api_version_and_paths_build_endpoints() {
    let config = config_from(&[
        ("E2E_BASE_URL", "http://shop.test"),
        ("E2E_API_VERSION", "v3"),
    ])
    .unwrap();

    assert_eq!(config.admin_api().endpoint(), "http://shop.test/api/v3");
    assert_eq!(config.store_api().endpoint(), "http://shop.test/store-api");
}

#[test]
fn test_empty_values_count_as_unset() {
    let config = config_from(&[("E2E_API_VERSION", " "), ("E2E_LOCALE", "")]).unwrap();

    assert_eq!(config.api_version, None);
    assert_eq!(config.locale, "en-GB");
}

#[test]
fn test_auth_config_carries_margin_and_account() {
    let config = config_from(&[
        ("E2E_MIN_TOKEN_LIFETIME", "120"),
        ("E2E_USERNAME", "owner"),
        ("E2E_SCOPE", "read"),
    ])
    .unwrap();

    let auth = config.auth();

    assert_eq!(auth.min_lifetime_margin, 120);
    assert_eq!(auth.username, "owner");
    assert_eq!(auth.scopes, "read");
    assert_eq!(auth.token_path, "/oauth/token");
}

#[test]
fn test_local_usage_flags() {
    assert!(config_from(&[("E2E_LOCAL_USAGE", "true")]).unwrap().local_usage);
    assert!(config_from(&[("E2E_LOCAL_USAGE", "1")]).unwrap().local_usage);
    assert!(!config_from(&[("E2E_LOCAL_USAGE", "FALSE")]).unwrap().local_usage);
}

#[test]
fn test_invalid_values_are_errors() {
    assert!(matches!(
        config_from(&[("E2E_CLEANUP_PORT", "port")]),
        Err(ConfigError::InvalidNumber { .. })
    ));
    assert!(matches!(
        config_from(&[("E2E_MIN_TOKEN_LIFETIME", "-5")]),
        Err(ConfigError::InvalidNumber { .. })
    ));
    assert!(matches!(
        config_from(&[("E2E_LOCAL_USAGE", "sometimes")]),
        Err(ConfigError::InvalidBool { .. })
    ));
}

#[test]
fn test_debug_output_hides_password() {
    let config = config_from(&[("E2E_PASSWORD", "hunter2")]).unwrap();

    let debug = format!("{config:?}");

    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<REDACTED>"));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    unsafe {
        std::env::set_var("E2E_BASE_URL", "http://env.shop.test");
        std::env::set_var("E2E_LOCAL_USAGE", "true");
        std::env::set_var("E2E_SHOPWARE_ROOT", "/srv/shopware");
    }

    let config = HarnessConfig::from_env().unwrap();

    assert_eq!(config.base_url, "http://env.shop.test");
    assert!(config.local_usage);
    assert_eq!(config.shopware_root, PathBuf::from("/srv/shopware"));

    unsafe {
        std::env::remove_var("E2E_BASE_URL");
        std::env::remove_var("E2E_LOCAL_USAGE");
        std::env::remove_var("E2E_SHOPWARE_ROOT");
    }
}
