//! Product options from the page's flat option table.
//!
//! The storefront embeds every selectable option as one script assignment:
//!
//! ```text
//! goods_sale_prop_str='{"10":{"id":"10","parent_id":"0","base_name":"Badge",...},
//!                       "11":{"id":"11","parent_id":"10","base_name":"Star","price":"2.50","listorder":"1"}}';
//! ```
//!
//! Records whose `parent_id` is `"0"` are categories; every other record is
//! an item of the category its `parent_id` names. The category name decides
//! the output bucket:
//!
//! | name contains (lower-cased) | bucket          |
//! |-----------------------------|-----------------|
//! | `custom`                    | `customization` |
//! | `badge`                     | `badges`        |
//! | `size`                      | `sizes`         |
//!
//! Keywords are tested in that order, so `"Customized Badge"` is a
//! customization. Categories matching none of them are dropped with their
//! items.

mod decode;
pub(crate) mod html;
mod literal;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use kitscrape_core::{BadgeOption, CustomizationOption, ProductOptions, SizeOption};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::OptionsError;
use crate::patterns::{strip_parenthetical, PLUS_PRICE_RE};

use decode::{decode_path_escapes, decode_unicode_escapes};
use literal::parse_object_literal;

pub use html::extract_html_options;

/// Parent id marking a top-level category.
pub const TOP_LEVEL_PARENT: &str = "0";

static PROP_STR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)goods_sale_prop_str\s*=\s*'(\{.*?\})'\s*;")
        .expect("valid goods_sale_prop_str regex")
});

/// Keys that may carry an option's image reference, in lookup order.
const IMAGE_KEYS: [&str; 4] = ["img", "image", "pic", "thumb"];

/// Output bucket a category routes its items into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Customization,
    Badge,
    Size,
}

impl OptionKind {
    /// Precedence order; the first keyword contained in the name wins.
    const KEYWORDS: [(&'static str, OptionKind); 3] = [
        ("custom", OptionKind::Customization),
        ("badge", OptionKind::Badge),
        ("size", OptionKind::Size),
    ];

    #[must_use]
    pub fn classify(category_name: &str) -> Option<Self> {
        let lower = category_name.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|&(_, kind)| kind)
    }
}

/// One entry of the option table, with loose values coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOptionRecord {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    /// `listorder`; `0` when missing or not numeric.
    pub sort_key: i64,
    /// `price`; `0` when missing or not numeric.
    pub price_delta: Decimal,
    pub image: Option<String>,
}

impl RawOptionRecord {
    fn from_entry(key: &str, value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(loose_string);
        Self {
            id: key.to_string(),
            parent_id: field("parent_id").unwrap_or_default(),
            name: field("base_name").unwrap_or_default(),
            sort_key: value.get("listorder").map_or(0, loose_i64),
            price_delta: value
                .get("price")
                .and_then(crate::jsonld::decimal_from_value)
                .unwrap_or(Decimal::ZERO),
            image: IMAGE_KEYS
                .iter()
                .find_map(|k| field(k))
                .filter(|s| !s.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn is_category(&self) -> bool {
        self.parent_id == TOP_LEVEL_PARENT
    }
}

/// Arena of option records in encounter order plus the category → items
/// index, built in one pass.
#[derive(Debug, Default)]
pub struct OptionTable {
    records: Vec<RawOptionRecord>,
    categories: Vec<usize>,
    children: HashMap<String, Vec<usize>>,
}

impl OptionTable {
    /// Builds the table from the parsed `id → record` mapping.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut table = Self::default();
        for (key, value) in map {
            if !value.is_object() {
                continue;
            }
            let record = RawOptionRecord::from_entry(key, value);
            let idx = table.records.len();
            if record.is_category() {
                table.categories.push(idx);
            } else {
                table
                    .children
                    .entry(record.parent_id.clone())
                    .or_default()
                    .push(idx);
            }
            table.records.push(record);
        }
        table
    }

    /// Categories in encounter order.
    pub fn categories(&self) -> impl Iterator<Item = &RawOptionRecord> {
        self.categories.iter().map(|&i| &self.records[i])
    }

    /// Items of `category_id`, sorted by sort key; ties keep encounter order.
    #[must_use]
    pub fn items_of(&self, category_id: &str) -> Vec<&RawOptionRecord> {
        let mut items: Vec<&RawOptionRecord> = self
            .children
            .get(category_id)
            .map(|idxs| idxs.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default();
        items.sort_by_key(|r| r.sort_key);
        items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Finds and reconciles the option table embedded in `page_text`.
///
/// # Errors
///
/// Returns [`OptionsError::LiteralNotFound`] when the page has no
/// assignment, and [`OptionsError::Unparseable`] / [`OptionsError::NotAnObject`]
/// when the literal cannot be read. Callers treat all of these as "no options".
pub fn extract_literal_options(page_text: &str) -> Result<ProductOptions, OptionsError> {
    let table = parse_option_table(page_text)?;
    Ok(reconcile(&table))
}

/// Locates the `goods_sale_prop_str` literal and parses it into an [`OptionTable`].
///
/// # Errors
///
/// See [`extract_literal_options`].
pub fn parse_option_table(page_text: &str) -> Result<OptionTable, OptionsError> {
    let literal = find_literal(page_text).ok_or(OptionsError::LiteralNotFound)?;
    match parse_literal(literal)? {
        Value::Object(map) => Ok(OptionTable::from_map(&map)),
        _ => Err(OptionsError::NotAnObject),
    }
}

fn find_literal(page_text: &str) -> Option<&str> {
    PROP_STR_RE
        .captures(page_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Tolerant literal parse first, then strict JSON after un-escaping quotes.
fn parse_literal(literal: &str) -> Result<Value, OptionsError> {
    let lenient = match parse_object_literal(literal) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    let normalized = literal.replace("\\\"", "\"");
    serde_json::from_str(&normalized).map_err(|strict| OptionsError::Unparseable {
        lenient: lenient.to_string(),
        strict: strict.to_string(),
    })
}

/// Routes every category's sorted items into their bucket and shapes them.
/// Empty buckets are left `None`.
#[must_use]
pub fn reconcile(table: &OptionTable) -> ProductOptions {
    let mut sizes = Vec::new();
    let mut badges = Vec::new();
    let mut customization = Vec::new();

    for category in table.categories() {
        let Some(kind) = OptionKind::classify(&category.name) else {
            tracing::debug!(category = %category.name, "dropping unrecognised option category");
            continue;
        };
        let items = table.items_of(&category.id);
        match kind {
            OptionKind::Size => sizes.extend(items.into_iter().map(size_option)),
            OptionKind::Badge => badges.extend(items.into_iter().map(badge_option)),
            OptionKind::Customization => {
                customization.extend(items.into_iter().map(customization_option));
            }
        }
    }

    ProductOptions {
        sizes: non_empty(sizes),
        badges: non_empty(badges),
        customization: non_empty(customization),
    }
}

fn size_option(record: &RawOptionRecord) -> SizeOption {
    // A zero delta with a "(+US$ n)" suffix in the name means the price
    // only lives in the display text.
    let additional_cost = if record.price_delta.is_zero() {
        price_in_text(&record.name).unwrap_or(Decimal::ZERO)
    } else {
        record.price_delta
    };
    SizeOption {
        value: strip_parenthetical(&record.name),
        additional_cost,
    }
}

fn badge_option(record: &RawOptionRecord) -> BadgeOption {
    BadgeOption {
        name: record.name.trim().to_string(),
        image: record.image.as_deref().map(clean_image_url),
        additional_cost: record.price_delta,
    }
}

fn customization_option(record: &RawOptionRecord) -> CustomizationOption {
    CustomizationOption {
        kind: decode_unicode_escapes(record.name.trim()),
        additional_cost: record.price_delta,
    }
}

fn clean_image_url(raw: &str) -> String {
    decode_unicode_escapes(&decode_path_escapes(raw.trim()))
}

/// Amount of the first `+US$ n` in `text`.
pub(crate) fn price_in_text(text: &str) -> Option<Decimal> {
    PLUS_PRICE_RE
        .captures(text)
        .and_then(|caps| Decimal::from_str(&caps[1]).ok())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn loose_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn loose_i64(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../options_test.rs"]
mod tests;
