//! Structural summary of a fetched page, for checking what the extractors
//! will see before running a crawl.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::fallback::element_text;

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector")
});

const TITLE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub status: u16,
    /// First `<h1>` text, cut to 100 characters.
    pub title: Option<String>,
    pub links: usize,
    pub images: usize,
    pub table_rows: usize,
    pub jsonld_blocks: usize,
    pub has_option_table: bool,
    pub bytes: usize,
}

#[must_use]
pub fn summarize_page(status: u16, html: &str) -> PageSummary {
    let doc = Html::parse_document(html);
    PageSummary {
        status,
        title: doc
            .select(&H1)
            .next()
            .map(|h| element_text(h).chars().take(TITLE_PREVIEW_CHARS).collect()),
        links: doc.select(&A).count(),
        images: doc.select(&IMG).count(),
        table_rows: doc.select(&TR).count(),
        jsonld_blocks: doc.select(&LD_JSON).count(),
        has_option_table: html.contains("goods_sale_prop_str"),
        bytes: html.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_page_structure() {
        let html = r#"<html><head>
<script type="application/ld+json">{}</script>
<script>goods_sale_prop_str='{}';</script>
</head><body><h1> Man City  Home </h1>
<a href="/a">a</a><a href="/b">b</a><img src="x.jpg">
<table><tr><td>k</td><td>v</td></tr><tr><td>k2</td><td>v2</td></tr></table>
</body></html>"#;
        let summary = summarize_page(200, html);
        assert_eq!(summary.title.as_deref(), Some("Man City Home"));
        assert_eq!(summary.links, 2);
        assert_eq!(summary.images, 1);
        assert_eq!(summary.table_rows, 2);
        assert_eq!(summary.jsonld_blocks, 1);
        assert!(summary.has_option_table);
        assert_eq!(summary.bytes, html.len());
    }

    #[test]
    fn long_titles_are_cut() {
        let html = format!("<h1>{}</h1>", "x".repeat(300));
        let title = summarize_page(200, &html).title.unwrap();
        assert_eq!(title.chars().count(), TITLE_PREVIEW_CHARS);
    }

    #[test]
    fn error_page_has_no_title() {
        let summary = summarize_page(404, "<p>Not Found</p>");
        assert_eq!(summary.status, 404);
        assert!(summary.title.is_none());
        assert!(!summary.has_option_table);
    }
}
