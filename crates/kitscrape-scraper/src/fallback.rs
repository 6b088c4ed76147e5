//! Fallback source: pattern matching over raw tags, text and inline scripts.
//!
//! Every function here is independent and returns `None`/empty on a miss, so
//! the assembler can take only the fields the JSON-LD blocks left unresolved.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::sync::LazyLock;

use kitscrape_core::{Crumb, Pricing, ProductImage};
use regex::Regex;
use reqwest::Url;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Node, Selector};

use crate::patterns::{
    squash_whitespace, strip_resize_suffix, BRAND_HREF_RE, CATEGORY_HREF_RE, GOODS_ID_RE,
    IMAGE_HOST_RE, ITEM_NO_RE, US_PRICE_RE,
};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("valid selector"));
static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid selector"));
static CLASSED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class]").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));

static WEIGHT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)weight").expect("valid weight regex"));
static SOLD_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(sold|sales)\b").expect("valid sold regex"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digits regex"));
static DESCRIPTION_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)detail|description").expect("valid class regex"));

/// Whitespace-normalized text content of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    squash_whitespace(&el.text().collect::<String>())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Text nodes outside `<script>`/`<style>`, paired with their parent element.
fn visible_text_nodes(doc: &Html) -> impl Iterator<Item = (&str, ElementRef<'_>)> {
    doc.root_element().descendants().filter_map(|node| {
        let Node::Text(text) = node.value() else {
            return None;
        };
        let parent = node.parent().and_then(ElementRef::wrap)?;
        if matches!(parent.value().name(), "script" | "style") {
            return None;
        }
        Some((&**text, parent))
    })
}

/// Text of the first `<h1>`.
#[must_use]
pub fn title(doc: &Html) -> Option<String> {
    doc.select(&H1).next().map(element_text).and_then(non_empty)
}

/// `Item NO <digits>` in the title, else the quoted `goods_id` assignment in
/// an inline script.
#[must_use]
pub fn item_number(doc: &Html, title: Option<&str>) -> Option<String> {
    if let Some(caps) = title.and_then(|t| ITEM_NO_RE.captures(t)) {
        return Some(caps[1].to_string());
    }

    doc.select(&SCRIPT).find_map(|script| {
        let body = script.text().collect::<String>();
        if !body.contains("goods_id") {
            return None;
        }
        GOODS_ID_RE.captures(&body).map(|caps| caps[1].to_string())
    })
}

/// Text of the first link to a brand page.
#[must_use]
pub fn brand(doc: &Html) -> Option<String> {
    doc.select(&LINK)
        .find(|a| a.value().attr("href").is_some_and(|h| BRAND_HREF_RE.is_match(h)))
        .map(element_text)
        .and_then(non_empty)
}

/// The element following the one labelled "Weight".
#[must_use]
pub fn weight(doc: &Html) -> Option<String> {
    let (_, label) = visible_text_nodes(doc).find(|(text, _)| WEIGHT_LABEL_RE.is_match(text))?;
    label
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(element_text)
        .and_then(non_empty)
}

/// First run of digits in the element containing "Sold"/"Sales".
///
/// `None` when the label is present but carries no number.
#[must_use]
pub fn sold_count(doc: &Html) -> Option<u64> {
    let (_, container) = visible_text_nodes(doc).find(|(text, _)| SOLD_LABEL_RE.is_match(text))?;
    let text = container.text().collect::<String>();
    DIGITS_RE
        .find(&text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Every `<img>` served from the storefront's image host, at full
/// resolution, de-duplicated by URL.
#[must_use]
pub fn images(doc: &Html) -> Vec<ProductImage> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for img in doc.select(&IMG) {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        if !IMAGE_HOST_RE.is_match(src) {
            continue;
        }
        let url = strip_resize_suffix(src);
        if !seen.insert(url.clone()) {
            continue;
        }
        images.push(ProductImage {
            url,
            thumbnail: Some(src.to_string()),
            alt: img.value().attr("alt").unwrap_or_default().to_string(),
            local_path: None,
        });
    }

    images
}

/// Text of the first element with a `detail`/`description` class.
#[must_use]
pub fn description(doc: &Html) -> String {
    doc.select(&CLASSED)
        .find(|el| el.value().classes().any(|c| DESCRIPTION_CLASS_RE.is_match(c)))
        .map(element_text)
        .unwrap_or_default()
}

/// Every two-cell table row as `label → value`; later rows overwrite.
#[must_use]
pub fn specifications(doc: &Html) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    for row in doc.select(&TR) {
        let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
        if let [key, value] = cells.as_slice() {
            specs.insert(element_text(*key), element_text(*value));
        }
    }
    specs
}

/// Every link to a category page, in document order, made absolute
/// against `page_url`.
#[must_use]
pub fn breadcrumb(doc: &Html, page_url: &str) -> Vec<Crumb> {
    let base = Url::parse(page_url).ok();
    doc.select(&LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !CATEGORY_HREF_RE.is_match(href) {
                return None;
            }
            Some(Crumb {
                name: element_text(a),
                url: absolutize(base.as_ref(), href),
            })
        })
        .collect()
}

/// First `US$ <amount>` in visible text that is not a `+US$` option delta.
#[must_use]
pub fn pricing(doc: &Html) -> Option<Pricing> {
    visible_text_nodes(doc).find_map(|(text, _)| {
        US_PRICE_RE.captures_iter(text).find_map(|caps| {
            let whole = caps.get(0)?;
            if text[..whole.start()].trim_end().ends_with('+') {
                return None;
            }
            let base_price = Decimal::from_str(&caps[1]).ok()?;
            Some(Pricing {
                base_price,
                currency: "USD".to_string(),
            })
        })
    })
}

/// Resolves `href` against `base`, returning it unchanged when either is
/// unusable.
pub(crate) fn absolutize(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map_or_else(|| href.to_string(), |u| u.to_string())
}

#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;
