//! Primary source: schema.org JSON-LD blocks embedded in the product page.

use std::str::FromStr;
use std::sync::LazyLock;

use kitscrape_core::{Crumb, Pricing};
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use serde_json::Value;

static JSONLD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid json-ld selector")
});

/// Fields read from the first well-formed `Product` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonLdProduct {
    pub title: Option<String>,
    /// `mpn`, falling back to `sku`.
    pub item_number: Option<String>,
    pub brand: Option<String>,
    pub images: Vec<String>,
    pub pricing: Option<Pricing>,
}

/// Everything the JSON-LD blocks contributed. Each part is `None`/empty when
/// no block of that type was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonLdData {
    pub product: Option<JsonLdProduct>,
    pub breadcrumb: Vec<Crumb>,
}

/// Scans every `application/ld+json` script. Bodies that fail to parse are
/// skipped; the first `Product` and the first non-empty `BreadcrumbList` win.
#[must_use]
pub fn extract_jsonld(doc: &Html) -> JsonLdData {
    let mut data = JsonLdData::default();

    for script in doc.select(&JSONLD_SELECTOR) {
        if data.product.is_some() && !data.breadcrumb.is_empty() {
            break;
        }

        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed JSON-LD block");
                continue;
            }
        };

        for node in candidate_nodes(value) {
            if data.product.is_none() && has_type(&node, "Product") {
                data.product = Some(product_from_node(&node));
            } else if data.breadcrumb.is_empty() && has_type(&node, "BreadcrumbList") {
                data.breadcrumb = breadcrumb_from_node(&node);
            }
        }
    }

    data
}

/// Flattens a top-level array and any `@graph` containers into one list of
/// candidate nodes, in source order.
fn candidate_nodes(value: Value) -> Vec<Value> {
    let top = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut nodes = Vec::with_capacity(top.len());
    for item in top {
        if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
            nodes.extend(graph.iter().cloned());
        }
        nodes.push(item);
    }
    nodes
}

/// `@type` may be a string or an array of strings.
fn has_type(node: &Value, wanted: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(wanted)),
        _ => false,
    }
}

fn product_from_node(node: &Value) -> JsonLdProduct {
    let item_number = non_empty_str(node.get("mpn")).or_else(|| non_empty_str(node.get("sku")));

    // `brand` is normally `{"@type": "Brand", "name": ...}` but some pages use a bare string.
    let brand = node.get("brand").and_then(|b| match b {
        Value::String(_) => non_empty_str(Some(b)),
        _ => non_empty_str(b.get("name")),
    });

    JsonLdProduct {
        title: non_empty_str(node.get("name")),
        item_number,
        brand,
        images: image_urls(node.get("image")),
        pricing: node.get("offers").and_then(pricing_from_offers),
    }
}

/// `image` is a single URL, a list of URLs, or `ImageObject`s with a `url`.
fn image_urls(image: Option<&Value>) -> Vec<String> {
    let one = |v: &Value| match v {
        Value::String(_) => non_empty_str(Some(v)),
        _ => non_empty_str(v.get("url")),
    };

    match image {
        Some(Value::Array(items)) => items.iter().filter_map(one).collect(),
        Some(v) => one(v).into_iter().collect(),
        None => Vec::new(),
    }
}

/// `offers` may be one `Offer` or a list; the first offer with a usable
/// price and a currency is taken.
fn pricing_from_offers(offers: &Value) -> Option<Pricing> {
    let single = |offer: &Value| -> Option<Pricing> {
        let base_price = offer.get("price").and_then(decimal_from_value)?;
        if base_price.is_sign_negative() {
            return None;
        }
        let currency = non_empty_str(offer.get("priceCurrency"))?;
        Some(Pricing {
            base_price,
            currency,
        })
    };

    match offers {
        Value::Array(items) => items.iter().find_map(single),
        other => single(other),
    }
}

fn breadcrumb_from_node(node: &Value) -> Vec<Crumb> {
    let Some(items) = node.get("itemListElement").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|element| {
            let item = element.get("item");
            // `item` is either the URL itself or a `Thing` carrying `@id`/`url`/`name`.
            let url = match item {
                Some(Value::String(_)) => non_empty_str(item),
                Some(obj) => {
                    non_empty_str(obj.get("@id")).or_else(|| non_empty_str(obj.get("url")))
                }
                None => None,
            }
            .unwrap_or_default();
            let name = non_empty_str(element.get("name"))
                .or_else(|| item.and_then(|i| non_empty_str(i.get("name"))))?;
            Some(Crumb { name, url })
        })
        .collect()
}

pub(crate) fn decimal_from_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        _ => None,
    }
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
