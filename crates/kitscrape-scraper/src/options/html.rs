//! Options read from the rendered option blocks when the embedded table is
//! missing: a text label (`Size:`, `Badge:`, `Customized:`) whose container
//! holds one link per selectable item.

use std::sync::LazyLock;

use kitscrape_core::{BadgeOption, CustomizationOption, ProductOptions, SizeOption};
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Node, Selector};

use super::{non_empty, price_in_text};
use crate::fallback::element_text;
use crate::patterns::strip_parenthetical;

static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("valid selector"));

const SIZE_LABEL: &str = "Size:";
const BADGE_LABEL: &str = "Badge:";
const CUSTOM_LABEL: &str = "Customized:";

/// Reads the three labelled option blocks. Blocks that are missing or hold
/// no links leave their bucket `None`.
#[must_use]
pub fn extract_html_options(doc: &Html) -> ProductOptions {
    let sizes = option_links(doc, SIZE_LABEL)
        .into_iter()
        .map(|link| {
            let text = element_text(link);
            SizeOption {
                value: strip_parenthetical(&text),
                additional_cost: price_in_text(&text).unwrap_or(Decimal::ZERO),
            }
        })
        .collect();

    let badges = option_links(doc, BADGE_LABEL)
        .into_iter()
        .map(|link| {
            let img = link.select(&IMG).next();
            let text = match img {
                Some(img) => img.value().attr("alt").unwrap_or_default().trim().to_string(),
                None => element_text(link),
            };
            let additional_cost = price_in_text(&text)
                .or_else(|| price_in_text(&element_text(link)))
                .unwrap_or(Decimal::ZERO);
            BadgeOption {
                name: strip_parenthetical(&text),
                image: img
                    .and_then(|i| i.value().attr("src"))
                    .map(str::to_string),
                additional_cost,
            }
        })
        .collect();

    let customization = option_links(doc, CUSTOM_LABEL)
        .into_iter()
        .map(|link| {
            let text = element_text(link);
            CustomizationOption {
                kind: strip_parenthetical(&text),
                additional_cost: price_in_text(&text).unwrap_or(Decimal::ZERO),
            }
        })
        .collect();

    ProductOptions {
        sizes: non_empty(sizes),
        badges: non_empty(badges),
        customization: non_empty(customization),
    }
}

/// Links inside the element holding `label`. When the label sits alone in
/// its own element, the links are looked up one level higher.
fn option_links<'a>(doc: &'a Html, label: &str) -> Vec<ElementRef<'a>> {
    let Some(holder) = doc.root_element().descendants().find_map(|node| {
        let Node::Text(text) = node.value() else {
            return None;
        };
        if !text.contains(label) {
            return None;
        }
        node.parent()
            .and_then(ElementRef::wrap)
            .filter(|parent| !matches!(parent.value().name(), "script" | "style"))
    }) else {
        return Vec::new();
    };

    let links: Vec<ElementRef<'a>> = holder.select(&LINK).collect();
    if !links.is_empty() {
        return links;
    }
    holder
        .parent()
        .and_then(ElementRef::wrap)
        .map(|outer| outer.select(&LINK).collect())
        .unwrap_or_default()
}
