use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://www.kkgool1.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = parse_base_url(&or_default("KITSCRAPE_BASE_URL", DEFAULT_BASE_URL))?;
    let log_level = or_default("KITSCRAPE_LOG_LEVEL", "info");
    let user_agent = or_default("KITSCRAPE_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("KITSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;

    let page_delay_ms = parse_u64("KITSCRAPE_PAGE_DELAY_MS", "1000")?;
    let category_delay_ms = parse_u64("KITSCRAPE_CATEGORY_DELAY_MS", "2000")?;
    let product_delay_ms = parse_u64("KITSCRAPE_PRODUCT_DELAY_MS", "2000")?;
    let image_delay_ms = parse_u64("KITSCRAPE_IMAGE_DELAY_MS", "500")?;

    let image_dir = PathBuf::from(or_default("KITSCRAPE_IMAGE_DIR", "downloads/images"));
    let output_dir = PathBuf::from(or_default("KITSCRAPE_OUTPUT_DIR", "."));
    let backup_every = parse_usize("KITSCRAPE_BACKUP_EVERY", "10")?;

    Ok(AppConfig {
        base_url,
        log_level,
        user_agent,
        request_timeout_secs,
        page_delay_ms,
        category_delay_ms,
        product_delay_ms,
        image_delay_ms,
        image_dir,
        output_dir,
        backup_every,
    })
}

/// Validates the storefront origin and strips any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "KITSCRAPE_BASE_URL".to_string(),
            reason: format!("\"{raw}\" is not an http(s) origin"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
