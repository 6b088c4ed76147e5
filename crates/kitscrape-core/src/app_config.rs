use std::path::PathBuf;

/// Runtime settings for the scraper and its CLI.
///
/// Every politeness delay is configurable; none of them are correctness
/// mechanisms, so `0` is a valid value for all of them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storefront origin, e.g. `"https://www.kkgool1.com"`. No trailing slash.
    pub base_url: String,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Delay between paginated requests within one category.
    pub page_delay_ms: u64,
    /// Delay between categories during a whole-site crawl.
    pub category_delay_ms: u64,
    /// Delay between product page requests.
    pub product_delay_ms: u64,
    /// Delay between image downloads.
    pub image_delay_ms: u64,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Write a backup file every N scraped products. `0` disables backups.
    pub backup_every: usize,
}
