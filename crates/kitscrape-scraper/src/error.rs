use std::path::PathBuf;

use thiserror::Error;

/// Failures of the orchestration layer: fetching pages and images, and
/// writing output. Extraction itself never produces one of these.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {category_url}: exceeded {max_pages} pages")]
    PaginationLimit {
        category_url: String,
        max_pages: usize,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the embedded option table. Reported by the caller, never
/// propagated past the record assembler.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("no goods_sale_prop_str assignment found in page")]
    LiteralNotFound,

    #[error("option literal is not a valid object literal ({lenient}) nor JSON ({strict})")]
    Unparseable { lenient: String, strict: String },

    #[error("option literal parsed but is not an object keyed by option id")]
    NotAnObject,
}
