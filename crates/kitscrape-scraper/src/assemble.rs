//! Builds one [`ProductRecord`] from a fetched product page.
//!
//! Each field is resolved once into a [`Sourced`] value: the JSON-LD value
//! when present, else the fallback extractor's value, else absent. The
//! fallback is only evaluated for fields the JSON-LD blocks left open.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use kitscrape_core::{BasicInfo, ProductImage, ProductOptions, ProductRecord};
use scraper::Html;

use crate::error::OptionsError;
use crate::fallback;
use crate::jsonld::extract_jsonld;
use crate::options::{extract_html_options, extract_literal_options};

/// Where a resolved field came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    Primary(T),
    Fallback(T),
    Absent,
}

impl<T> Sourced<T> {
    /// Primary value if present, else the (lazily computed) fallback.
    pub fn pick(primary: Option<T>, fallback: impl FnOnce() -> Option<T>) -> Self {
        match primary {
            Some(v) => Self::Primary(v),
            None => fallback().map_or(Self::Absent, Self::Fallback),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Primary(v) | Self::Fallback(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Primary(v) | Self::Fallback(v) => Some(v),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary(_) => "jsonld",
            Self::Fallback(_) => "html",
            Self::Absent => "absent",
        }
    }
}

/// Extracts a full product record from `page_html`, fetched from `url`.
///
/// Never fails: fields that cannot be extracted are left absent or empty.
#[must_use]
pub fn extract_product(page_html: &str, url: &str, scraped_at: DateTime<Utc>) -> ProductRecord {
    let doc = Html::parse_document(page_html);
    let jsonld = extract_jsonld(&doc);
    let primary = jsonld.product.unwrap_or_default();

    let title = Sourced::pick(primary.title, || fallback::title(&doc));
    let item_number = Sourced::pick(primary.item_number, || {
        fallback::item_number(&doc, title.value().map(String::as_str))
    });
    let brand = Sourced::pick(primary.brand, || fallback::brand(&doc));
    let pricing = Sourced::pick(primary.pricing, || fallback::pricing(&doc));

    let primary_images = primary.images.into_iter().map(ProductImage::new);
    let images = dedup_images(primary_images.chain(fallback::images(&doc)));

    let category_path = if jsonld.breadcrumb.is_empty() {
        fallback::breadcrumb(&doc, url)
    } else {
        jsonld.breadcrumb
    };

    tracing::debug!(
        url,
        title = title.label(),
        item_number = item_number.label(),
        brand = brand.label(),
        pricing = pricing.label(),
        images = images.len(),
        "resolved product fields"
    );

    ProductRecord {
        url: url.to_string(),
        scraped_at,
        basic_info: BasicInfo {
            title: title.into_option(),
            item_number: item_number.into_option(),
            brand: brand.into_option(),
            weight: fallback::weight(&doc),
            sold_count: fallback::sold_count(&doc),
        },
        images,
        options: extract_options(page_html, &doc),
        pricing: pricing.into_option(),
        description: fallback::description(&doc),
        specifications: fallback::specifications(&doc),
        category_path,
    }
}

/// Options from the embedded option table, or from the rendered option
/// blocks when the table is missing or yields no buckets. A table that is
/// present but unreadable gives empty options.
#[must_use]
pub fn extract_options(page_html: &str, doc: &Html) -> ProductOptions {
    match extract_literal_options(page_html) {
        Ok(options) if !options.is_empty() => return options,
        Ok(_) => tracing::debug!("option table has no recognised categories"),
        Err(OptionsError::LiteralNotFound) => tracing::debug!("page has no option table"),
        Err(e) => {
            tracing::warn!(error = %e, "could not read option table");
            return ProductOptions::default();
        }
    }
    extract_html_options(doc)
}

/// [`extract_options`] for a page that has not been parsed yet.
#[must_use]
pub fn options_for_page(page_html: &str) -> ProductOptions {
    extract_options(page_html, &Html::parse_document(page_html))
}

/// Keeps the first image for each URL, preserving order.
pub fn dedup_images(images: impl IntoIterator<Item = ProductImage>) -> Vec<ProductImage> {
    let mut seen = HashSet::new();
    images
        .into_iter()
        .filter(|img| seen.insert(img.url.clone()))
        .collect()
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;
