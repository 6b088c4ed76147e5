//! Category listing pages and the links they carry.
//!
//! A category is paged with a `page` query parameter:
//!
//! ```text
//! https://www.kkgool1.com/Man-City-c58021.html           page 1
//! https://www.kkgool1.com/Man-City-c58021.html?page=2    page 2
//! ```
//!
//! Listing ends at the first page that carries no product links.

use std::collections::HashSet;
use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::fallback::absolutize;
use crate::patterns::{is_category_href, is_product_href};

static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// URL of listing page `page` (1-based) of a category. Page 1 is the bare
/// category URL.
#[must_use]
pub fn category_page_url(category_url: &str, page: usize) -> String {
    if page <= 1 {
        return category_url.to_owned();
    }
    match Url::parse(category_url) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
            url.to_string()
        }
        Err(_) => {
            let sep = if category_url.contains('?') { '&' } else { '?' };
            format!("{category_url}{sep}page={page}")
        }
    }
}

/// Absolute product page links in `html`, de-duplicated, first seen first.
#[must_use]
pub fn product_links(html: &str, page_url: &str) -> Vec<String> {
    matching_links(html, page_url, is_product_href)
}

/// Absolute category links in `html`, de-duplicated and sorted.
#[must_use]
pub fn category_links(html: &str, page_url: &str) -> Vec<String> {
    let mut links = matching_links(html, page_url, is_category_href);
    links.sort();
    links
}

fn matching_links(html: &str, page_url: &str, keep: fn(&str) -> bool) -> Vec<String> {
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url).ok();
    let mut seen = HashSet::new();

    doc.select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| keep(href))
        .map(|href| absolutize(base.as_ref(), href))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORY: &str = "https://www.kkgool1.com/Man-City-c58021.html";

    #[test]
    fn first_page_is_bare_category_url() {
        assert_eq!(category_page_url(CATEGORY, 1), CATEGORY);
        assert_eq!(category_page_url(CATEGORY, 0), CATEGORY);
    }

    #[test]
    fn later_pages_carry_page_param() {
        assert_eq!(
            category_page_url(CATEGORY, 3),
            "https://www.kkgool1.com/Man-City-c58021.html?page=3"
        );
    }

    #[test]
    fn page_param_is_appended_to_existing_query() {
        assert_eq!(
            category_page_url("https://www.kkgool1.com/x-c1.html?sort=new", 2),
            "https://www.kkgool1.com/x-c1.html?sort=new&page=2"
        );
    }

    #[test]
    fn product_links_are_absolute_and_deduplicated() {
        let html = r#"<div>
            <a href="/Home-Kit-p100.html">Home</a>
            <a href="https://www.kkgool1.com/Away-Kit-p200.html">Away</a>
            <a href="/Home-Kit-p100.html"><img src="x.jpg"></a>
            <a href="/Man-City-c58021.html">Category</a>
            <a href="/about.html">About</a>
        </div>"#;
        assert_eq!(
            product_links(html, CATEGORY),
            vec![
                "https://www.kkgool1.com/Home-Kit-p100.html",
                "https://www.kkgool1.com/Away-Kit-p200.html",
            ]
        );
    }

    #[test]
    fn empty_listing_has_no_product_links() {
        assert!(product_links("<p>No products found</p>", CATEGORY).is_empty());
    }

    #[test]
    fn category_links_are_sorted() {
        let html = r#"<ul>
            <li><a href="/Zeta-c9.html">Zeta</a></li>
            <li><a href="/Alpha-c2.html">Alpha</a></li>
            <li><a href="/Zeta-c9.html">Zeta again</a></li>
            <li><a href="/Shirt-p5.html">Shirt</a></li>
        </ul>"#;
        assert_eq!(
            category_links(html, "https://www.kkgool1.com/h-sitemap-pc.html"),
            vec![
                "https://www.kkgool1.com/Alpha-c2.html",
                "https://www.kkgool1.com/Zeta-c9.html",
            ]
        );
    }
}
