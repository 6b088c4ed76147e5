//! Scrape command handlers.
//!
//! Called from `main` once the config and client exist. Per-product failures
//! inside a category or site crawl are logged and skipped by the scraper
//! crate; only setup and output failures reach the caller.

use std::path::Path;

use kitscrape_core::AppConfig;
use kitscrape_scraper::{
    crawl_site, download_images, scrape_category, scrape_product, write_json, CrawlSettings,
    StorefrontClient,
};

/// Scrapes one product, prints it and writes it to `output`.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched or the file cannot be
/// written. Image download failures are logged, not returned.
pub(crate) async fn run_product(
    client: &StorefrontClient,
    config: &AppConfig,
    url: &str,
    output: &Path,
    with_images: bool,
) -> anyhow::Result<()> {
    let mut record = scrape_product(client, url).await?;

    if with_images {
        let stored =
            download_images(client, &mut record, &config.image_dir, config.image_delay_ms).await?;
        println!("downloaded {stored}/{} images", record.images.len());
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    write_json(output, &record).await?;
    println!("saved product to {}", output.display());
    Ok(())
}

/// Scrapes up to `limit` products of one category into `output`.
///
/// # Errors
///
/// Returns an error if the first listing page cannot be fetched or the file
/// cannot be written.
pub(crate) async fn run_category(
    client: &StorefrontClient,
    config: &AppConfig,
    url: &str,
    limit: usize,
    output: &Path,
    with_images: bool,
) -> anyhow::Result<()> {
    let settings = CrawlSettings::from_config(config, with_images);
    let collection = scrape_category(client, url, Some(limit), &settings).await?;

    for record in collection.products() {
        println!(
            "{}  {}",
            record.basic_info.title.as_deref().unwrap_or("<untitled>"),
            record.url
        );
    }
    collection.save(output).await?;
    println!(
        "saved {} products to {}",
        collection.len(),
        output.display()
    );
    Ok(())
}

/// Crawls the whole site under the configured base URL.
///
/// # Errors
///
/// Returns an error if the site map cannot be fetched or the final file
/// cannot be written.
pub(crate) async fn run_site(
    client: &StorefrontClient,
    config: &AppConfig,
    with_images: bool,
) -> anyhow::Result<()> {
    let settings = CrawlSettings::from_config(config, with_images);
    tracing::info!(base_url = %config.base_url, with_images, "starting site crawl");

    let summary = crawl_site(client, &config.base_url, &settings).await?;

    println!(
        "crawl complete: {} categories, {} product URLs, {} scraped, {} failed",
        summary.categories, summary.product_urls, summary.scraped, summary.failed
    );
    println!("saved to {}", summary.output_path.display());
    Ok(())
}
