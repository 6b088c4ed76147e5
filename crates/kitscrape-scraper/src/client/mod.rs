//! HTTP client for storefront pages and product images.

mod origin;
mod pages;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::ScraperError;

pub use origin::site_origin;
pub use pages::MAX_PAGES;
// Re-export for test visibility via `use super::*`
#[cfg(test)]
use origin::extract_domain;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,*/*;q=0.8";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/*,*/*;q=0.8";

/// A fetched page with its status, kept even when the status is not 2xx.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub status: u16,
    pub body: String,
}

/// HTTP client for storefront HTML pages and image files.
///
/// Every request is made once. Rate limiting (429), not-found (404) and other
/// non-2xx responses come back as typed errors; callers log them and move on
/// to the next unit of work.
pub struct StorefrontClient {
    client: Client,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with the configured timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches an HTML page as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429, carrying the `Retry-After` hint.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure.
    /// - [`ScraperError::InvalidUrl`]: `url` is not an absolute http(s) URL.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        check_url(url)?;
        let response = self.get_checked(url, HTML_ACCEPT).await?;
        Ok(response.text().await?)
    }

    /// Fetches an image body as raw bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_html`].
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        check_url(url)?;
        let response = self.get_checked(url, IMAGE_ACCEPT).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetches a page once and returns whatever status and body came back.
    /// Used for diagnostics, where a 404 or 500 is itself the answer.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] for a malformed URL and
    /// [`ScraperError::Http`] on network or TLS failure.
    pub async fn fetch_raw(&self, url: &str) -> Result<RawPage, ScraperError> {
        check_url(url)?;
        let response = self.request(url, HTML_ACCEPT).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawPage { status, body })
    }

    fn request(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::REFERER, site_origin(url))
    }

    /// Sends one GET and maps non-2xx statuses to typed errors.
    async fn get_checked(&self, url: &str, accept: &str) -> Result<Response, ScraperError> {
        let response = self.request(url, accept).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: origin::extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}

/// Rejects anything that is not an absolute http(s) URL before a request is
/// built.
fn check_url(url: &str) -> Result<(), ScraperError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
