//! Canonical product record written to the JSON output files.
//!
//! Field names match the on-disk JSON shape. Absent optional fields inside
//! `basic_info` and `options` are omitted from the output rather than
//! serialized as `null`; `BadgeOption::image` is the one place where `null`
//! is the documented absence marker.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scraped product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub basic_info: BasicInfo,
    /// Unique by `url`, first occurrence wins.
    pub images: Vec<ProductImage>,
    pub options: ProductOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    pub description: String,
    /// Label → value rows from the two-column specification table.
    pub specifications: BTreeMap<String, String>,
    pub category_path: Vec<Crumb>,
}

impl ProductRecord {
    /// Directory name used for this product's downloaded images.
    #[must_use]
    pub fn image_key(&self) -> &str {
        self.basic_info.item_number.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Absent when the sold/sales label carries no digits; never defaulted to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Full-resolution URL with any resize suffix removed.
    pub url: String,
    /// URL as it appeared in the page, when it came from an `<img>` tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub alt: String,
    /// Filled in by the image downloader after a successful write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl ProductImage {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            thumbnail: None,
            alt: String::new(),
            local_path: None,
        }
    }
}

/// The three option buckets. A bucket is `None` rather than an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<SizeOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<Vec<BadgeOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Vec<CustomizationOption>>,
}

impl ProductOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_none() && self.badges.is_none() && self.customization.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub value: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeOption {
    pub name: String,
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub currency: String,
}

/// One breadcrumb hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub name: String,
    pub url: String,
}
