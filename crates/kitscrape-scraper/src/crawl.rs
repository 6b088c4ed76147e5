//! Crawl orchestration: single products, one category, or the whole site.
//!
//! Everything runs sequentially with the configured politeness delays. A
//! product that fails to fetch is logged and skipped; only a failure to
//! discover categories or to write the final file aborts a crawl.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use kitscrape_core::{AppConfig, ProductRecord};

use crate::assemble::extract_product;
use crate::client::StorefrontClient;
use crate::error::ScraperError;
use crate::images::download_images;
use crate::output::write_json;

pub const FINAL_OUTPUT_FILE: &str = "products_data_final.json";

/// Delays, directories and switches for a crawl.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub page_delay_ms: u64,
    pub category_delay_ms: u64,
    pub product_delay_ms: u64,
    pub image_delay_ms: u64,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Write a backup file every this many scraped products; `0` disables.
    pub backup_every: usize,
    pub download_images: bool,
}

impl CrawlSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig, download_images: bool) -> Self {
        Self {
            page_delay_ms: config.page_delay_ms,
            category_delay_ms: config.category_delay_ms,
            product_delay_ms: config.product_delay_ms,
            image_delay_ms: config.image_delay_ms,
            image_dir: config.image_dir.clone(),
            output_dir: config.output_dir.clone(),
            backup_every: config.backup_every,
            download_images,
        }
    }
}

/// Append-only sink for scraped records, in scrape order.
#[derive(Debug, Default)]
pub struct ProductCollection {
    products: Vec<ProductRecord>,
}

impl ProductCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProductRecord) {
        self.products.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    #[must_use]
    pub fn into_products(self) -> Vec<ProductRecord> {
        self.products
    }

    /// Writes the whole collection as one JSON array.
    ///
    /// # Errors
    ///
    /// See [`write_json`].
    pub async fn save(&self, path: &Path) -> Result<(), ScraperError> {
        write_json(path, &self.products).await?;
        tracing::info!(path = %path.display(), count = self.len(), "saved products");
        Ok(())
    }
}

/// What a whole-site crawl did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub categories: usize,
    pub product_urls: usize,
    pub scraped: usize,
    pub failed: usize,
    pub output_path: PathBuf,
}

/// Fetches one product page and extracts its record.
///
/// # Errors
///
/// Propagates any error from [`StorefrontClient::fetch_html`]. Extraction
/// itself never fails.
pub async fn scrape_product(
    client: &StorefrontClient,
    url: &str,
) -> Result<ProductRecord, ScraperError> {
    let html = client.fetch_html(url).await?;
    let record = extract_product(&html, url, Utc::now());
    tracing::info!(
        url,
        title = record.basic_info.title.as_deref().unwrap_or_default(),
        images = record.images.len(),
        "scraped product"
    );
    Ok(record)
}

/// Scrapes the first `limit` products of one category (all when `None`).
///
/// # Errors
///
/// Propagates any error from [`StorefrontClient::category_product_urls`].
pub async fn scrape_category(
    client: &StorefrontClient,
    category_url: &str,
    limit: Option<usize>,
    settings: &CrawlSettings,
) -> Result<ProductCollection, ScraperError> {
    let mut urls = client
        .category_product_urls(category_url, settings.page_delay_ms)
        .await?;
    tracing::info!(category_url, found = urls.len(), "category product URLs");
    if let Some(limit) = limit {
        urls.truncate(limit);
    }

    let mut collection = ProductCollection::new();
    scrape_urls(client, &urls, settings, &mut collection, None).await;
    Ok(collection)
}

/// Crawls every category under `base_url`, scrapes each distinct product
/// once and writes [`FINAL_OUTPUT_FILE`] into the output directory.
///
/// A backup file `products_data_backup_<n>.json` is written each time the
/// collection reaches a multiple of `backup_every` records.
///
/// # Errors
///
/// - Any error from [`StorefrontClient::category_urls`] (site map unreachable).
/// - [`ScraperError::Io`] / [`ScraperError::Serialize`] when the final file
///   cannot be written.
pub async fn crawl_site(
    client: &StorefrontClient,
    base_url: &str,
    settings: &CrawlSettings,
) -> Result<CrawlSummary, ScraperError> {
    let categories = client.category_urls(base_url).await?;

    let mut product_urls: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, category_url) in categories.iter().enumerate() {
        if idx > 0 && settings.category_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(settings.category_delay_ms)).await;
        }
        tracing::info!(
            category = idx + 1,
            total = categories.len(),
            category_url,
            "reading category"
        );
        match client
            .category_product_urls(category_url, settings.page_delay_ms)
            .await
        {
            Ok(urls) => {
                product_urls.extend(urls.into_iter().filter(|u| seen.insert(u.clone())));
            }
            Err(e) => tracing::warn!(category_url, error = %e, "skipping category"),
        }
    }
    tracing::info!(count = product_urls.len(), "unique product URLs");

    let mut collection = ProductCollection::new();
    let failed = scrape_urls(
        client,
        &product_urls,
        settings,
        &mut collection,
        Some(settings.output_dir.as_path()),
    )
    .await;

    let output_path = settings.output_dir.join(FINAL_OUTPUT_FILE);
    collection.save(&output_path).await?;

    Ok(CrawlSummary {
        categories: categories.len(),
        product_urls: product_urls.len(),
        scraped: collection.len(),
        failed,
        output_path,
    })
}

/// Scrapes `urls` in order into `collection`. With a `backup_dir`, a backup
/// file is written there every `settings.backup_every` records. Returns the
/// number of failed products.
async fn scrape_urls(
    client: &StorefrontClient,
    urls: &[String],
    settings: &CrawlSettings,
    collection: &mut ProductCollection,
    backup_dir: Option<&Path>,
) -> usize {
    let mut failed = 0usize;

    for (idx, url) in urls.iter().enumerate() {
        if idx > 0 && settings.product_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(settings.product_delay_ms)).await;
        }
        tracing::debug!(product = idx + 1, total = urls.len(), url, "scraping product");

        let mut record = match scrape_product(client, url).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(url, error = %e, "skipping product");
                failed += 1;
                continue;
            }
        };

        if settings.download_images {
            if let Err(e) = download_images(
                client,
                &mut record,
                &settings.image_dir,
                settings.image_delay_ms,
            )
            .await
            {
                tracing::warn!(url, error = %e, "image download skipped");
            }
        }

        collection.push(record);

        let every = settings.backup_every;
        if let Some(dir) = backup_dir.filter(|_| every > 0 && collection.len() % every == 0) {
            let path = dir.join(format!("products_data_backup_{}.json", collection.len()));
            if let Err(e) = collection.save(&path).await {
                tracing::warn!(error = %e, "backup write failed");
            }
        }
    }

    failed
}
