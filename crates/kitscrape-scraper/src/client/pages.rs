//! Multi-page listing loops for `StorefrontClient`.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::ScraperError;
use crate::pagination::{category_links, category_page_url, product_links};
use crate::patterns::SITEMAP_PATH;

use super::StorefrontClient;

/// Maximum number of listing pages fetched per category before giving up.
pub const MAX_PAGES: usize = 200;

impl StorefrontClient {
    /// Every category linked from the site map page under `base_url`,
    /// absolute, de-duplicated and sorted.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_html`].
    pub async fn category_urls(&self, base_url: &str) -> Result<Vec<String>, ScraperError> {
        let sitemap_url = format!("{}{SITEMAP_PATH}", base_url.trim_end_matches('/'));
        let html = self.fetch_html(&sitemap_url).await?;
        let categories = category_links(&html, &sitemap_url);
        tracing::info!(
            sitemap_url,
            count = categories.len(),
            "discovered categories"
        );
        Ok(categories)
    }

    /// Product URLs across every listing page of a category, in first-seen
    /// order without duplicates.
    ///
    /// Walks page 1, 2, ... until a page has no product links, or none that
    /// were not already seen. A page that fails to load also ends the walk;
    /// the URLs gathered so far are kept.
    /// `page_delay_ms` is slept between page requests.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::PaginationLimit`] if the category still has
    /// new product links after [`MAX_PAGES`] pages. Returns the fetch error when
    /// the very first page fails.
    pub async fn category_product_urls(
        &self,
        category_url: &str,
        page_delay_ms: u64,
    ) -> Result<Vec<String>, ScraperError> {
        let mut urls: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for page in 1..=MAX_PAGES {
            if page > 1 && page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(page_delay_ms)).await;
            }

            let page_url = category_page_url(category_url, page);
            let html = match self.fetch_html(&page_url).await {
                Ok(html) => html,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(page_url, error = %e, "listing page failed, ending category");
                    return Ok(urls);
                }
            };

            let links = product_links(&html, &page_url);
            if links.is_empty() {
                tracing::debug!(category_url, page, "no product links, end of category");
                return Ok(urls);
            }

            let before = urls.len();
            urls.extend(links.into_iter().filter(|link| seen.insert(link.clone())));
            let new = urls.len() - before;
            tracing::debug!(
                category_url,
                page,
                new,
                total = urls.len(),
                "listing page read"
            );
            // Out-of-range pages on this storefront repeat the last page.
            if new == 0 {
                return Ok(urls);
            }
        }

        Err(ScraperError::PaginationLimit {
            category_url: category_url.to_owned(),
            max_pages: MAX_PAGES,
        })
    }
}
