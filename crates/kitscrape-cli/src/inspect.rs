//! Debug commands for looking at a single page.

use std::fmt::Write as _;
use std::path::Path;

use kitscrape_scraper::{
    options_for_page, parse_option_table, summarize_page, OptionKind, OptionTable, OptionsError,
    PageSummary, StorefrontClient,
};

/// Prints the raw option categories of a product page and the options the
/// scraper would record for it. Rendered option blocks are only consulted
/// when the page has no option table or the table yields no buckets.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched.
pub(crate) async fn run_options(client: &StorefrontClient, url: &str) -> anyhow::Result<()> {
    let html = client.fetch_html(url).await?;

    match parse_option_table(&html) {
        Ok(table) => print!("{}", format_option_table(&table)),
        Err(OptionsError::LiteralNotFound) => {
            println!("no option table; using option blocks in the page markup");
        }
        Err(e) => println!("option table unreadable, recording no options: {e}"),
    }

    println!("{}", serde_json::to_string_pretty(&options_for_page(&html))?);
    Ok(())
}

/// Fetches `url` once, prints a structural summary and saves the body to
/// `save`, whatever the response status.
///
/// # Errors
///
/// Returns an error if the request fails outright or the file cannot be
/// written.
pub(crate) async fn run_diagnose(
    client: &StorefrontClient,
    url: &str,
    save: &Path,
) -> anyhow::Result<()> {
    println!("fetching {url}");
    let page = client.fetch_raw(url).await?;
    let summary = summarize_page(page.status, &page.body);
    print!("{}", format_summary(&summary));

    std::fs::write(save, &page.body)
        .map_err(|e| anyhow::anyhow!("failed to save {}: {e}", save.display()))?;
    println!("full HTML saved to {}", save.display());
    Ok(())
}

pub(crate) fn format_option_table(table: &OptionTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} option records", table.len());
    for category in table.categories() {
        let bucket = match OptionKind::classify(&category.name) {
            Some(OptionKind::Size) => "sizes",
            Some(OptionKind::Badge) => "badges",
            Some(OptionKind::Customization) => "customization",
            None => "(dropped)",
        };
        let items = table.items_of(&category.id);
        let _ = writeln!(
            out,
            "[{}] {} -> {bucket} ({} items)",
            category.id,
            category.name,
            items.len()
        );
        for item in items {
            let _ = writeln!(
                out,
                "    [{}] {}  listorder={} price={}",
                item.id, item.name, item.sort_key, item.price_delta
            );
        }
    }
    out
}

pub(crate) fn format_summary(summary: &PageSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "status: {}", summary.status);
    match &summary.title {
        Some(title) => {
            let _ = writeln!(out, "h1 title: {title}");
        }
        None => {
            let _ = writeln!(out, "h1 title: not found");
        }
    }
    let _ = writeln!(out, "html length: {} bytes", summary.bytes);
    let _ = writeln!(out, "<a> tags: {}", summary.links);
    let _ = writeln!(out, "<img> tags: {}", summary.images);
    let _ = writeln!(out, "<tr> rows: {}", summary.table_rows);
    let _ = writeln!(out, "JSON-LD blocks: {}", summary.jsonld_blocks);
    let _ = writeln!(
        out,
        "option table: {}",
        if summary.has_option_table { "present" } else { "missing" }
    );
    out
}
