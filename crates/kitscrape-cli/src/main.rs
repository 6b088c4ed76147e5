use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod inspect;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "kitscrape-cli")]
#[command(about = "Scrape product records from the kit storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a single product page
    Product {
        url: String,
        #[arg(long, default_value = "test_product.json")]
        output: PathBuf,
        #[arg(long)]
        download_images: bool,
    },
    /// Scrape the first products of one category
    Category {
        url: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long, default_value = "category_test.json")]
        output: PathBuf,
        #[arg(long)]
        download_images: bool,
    },
    /// Crawl every category on the site
    Site {
        /// Skip image downloads
        #[arg(long)]
        no_images: bool,
    },
    /// Print the option table of a product page
    Options { url: String },
    /// Fetch a page, report its structure and save the raw HTML
    Diagnose {
        url: String,
        #[arg(long, default_value = "product_page_debug.html")]
        save: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = kitscrape_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client =
        kitscrape_scraper::StorefrontClient::new(config.request_timeout_secs, &config.user_agent)
            .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;

    match cli.command {
        Commands::Product {
            url,
            output,
            download_images,
        } => scrape::run_product(&client, &config, &url, &output, download_images).await,
        Commands::Category {
            url,
            limit,
            output,
            download_images,
        } => {
            scrape::run_category(&client, &config, &url, limit, &output, download_images).await
        }
        Commands::Site { no_images } => scrape::run_site(&client, &config, !no_images).await,
        Commands::Options { url } => inspect::run_options(&client, &url).await,
        Commands::Diagnose { url, save } => inspect::run_diagnose(&client, &url, &save).await,
    }
}

#[cfg(test)]
mod tests;
