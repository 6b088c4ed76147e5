use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");

    assert_eq!(cfg.base_url, "https://www.kkgool1.com");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.page_delay_ms, 1000);
    assert_eq!(cfg.category_delay_ms, 2000);
    assert_eq!(cfg.product_delay_ms, 2000);
    assert_eq!(cfg.image_delay_ms, 500);
    assert_eq!(cfg.image_dir, PathBuf::from("downloads/images"));
    assert_eq!(cfg.output_dir, PathBuf::from("."));
    assert_eq!(cfg.backup_every, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("KITSCRAPE_BASE_URL", "http://localhost:8080/");
    map.insert("KITSCRAPE_PRODUCT_DELAY_MS", "0");
    map.insert("KITSCRAPE_REQUEST_TIMEOUT_SECS", "5");
    map.insert("KITSCRAPE_BACKUP_EVERY", "0");
    map.insert("KITSCRAPE_IMAGE_DIR", "/tmp/imgs");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides are valid");

    assert_eq!(cfg.base_url, "http://localhost:8080");
    assert_eq!(cfg.product_delay_ms, 0);
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.backup_every, 0);
    assert_eq!(cfg.image_dir, PathBuf::from("/tmp/imgs"));
}

#[test]
fn build_app_config_rejects_non_numeric_delay() {
    let mut map = HashMap::new();
    map.insert("KITSCRAPE_IMAGE_DELAY_MS", "half a second");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KITSCRAPE_IMAGE_DELAY_MS"),
        "expected InvalidEnvVar(KITSCRAPE_IMAGE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_base_url_without_scheme() {
    let mut map = HashMap::new();
    map.insert("KITSCRAPE_BASE_URL", "www.kkgool1.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KITSCRAPE_BASE_URL"),
        "expected InvalidEnvVar(KITSCRAPE_BASE_URL), got: {result:?}"
    );
}

#[test]
fn parse_base_url_rejects_bare_scheme() {
    assert!(parse_base_url("https://").is_err());
}
