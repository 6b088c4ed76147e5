pub mod assemble;
pub mod client;
pub mod crawl;
pub mod diagnose;
pub mod error;
pub mod fallback;
pub mod images;
pub mod jsonld;
pub mod options;
pub mod output;
pub mod pagination;
pub mod patterns;

pub use assemble::{extract_options, extract_product, options_for_page, Sourced};
pub use client::{RawPage, StorefrontClient};
pub use crawl::{
    crawl_site, scrape_category, scrape_product, CrawlSettings, CrawlSummary, ProductCollection,
};
pub use diagnose::{summarize_page, PageSummary};
pub use error::{OptionsError, ScraperError};
pub use images::download_images;
pub use options::{
    extract_html_options, extract_literal_options, parse_option_table, reconcile, OptionKind,
    OptionTable,
};
pub use output::write_json;
