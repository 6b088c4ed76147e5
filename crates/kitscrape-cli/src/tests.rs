use super::*;

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["kitscrape-cli"]).is_err());
}

#[test]
fn product_defaults() {
    let cli = Cli::try_parse_from(["kitscrape-cli", "product", "https://x.test/a-p1.html"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Product {
            ref url,
            ref output,
            download_images: false,
        } if url == "https://x.test/a-p1.html" && output == &PathBuf::from("test_product.json")
    ));
}

#[test]
fn product_with_images_and_output() {
    let cli = Cli::try_parse_from([
        "kitscrape-cli",
        "product",
        "https://x.test/a-p1.html",
        "--output",
        "out/one.json",
        "--download-images",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Product {
            ref output,
            download_images: true,
            ..
        } if output == &PathBuf::from("out/one.json")
    ));
}

#[test]
fn category_defaults_to_five_products() {
    let cli =
        Cli::try_parse_from(["kitscrape-cli", "category", "https://x.test/c-c1.html"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Category {
            limit: 5,
            ref output,
            download_images: false,
            ..
        } if output == &PathBuf::from("category_test.json")
    ));
}

#[test]
fn category_limit_override() {
    let cli = Cli::try_parse_from([
        "kitscrape-cli",
        "category",
        "https://x.test/c-c1.html",
        "--limit",
        "20",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Category { limit: 20, .. }));
}

#[test]
fn category_rejects_non_numeric_limit() {
    let result = Cli::try_parse_from([
        "kitscrape-cli",
        "category",
        "https://x.test/c-c1.html",
        "--limit",
        "many",
    ]);
    assert!(result.is_err());
}

#[test]
fn site_downloads_images_unless_disabled() {
    let cli = Cli::try_parse_from(["kitscrape-cli", "site"]).unwrap();
    assert!(matches!(cli.command, Commands::Site { no_images: false }));

    let cli = Cli::try_parse_from(["kitscrape-cli", "site", "--no-images"]).unwrap();
    assert!(matches!(cli.command, Commands::Site { no_images: true }));
}

#[test]
fn diagnose_default_save_path() {
    let cli =
        Cli::try_parse_from(["kitscrape-cli", "diagnose", "https://x.test/a-p1.html"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Diagnose { ref save, .. } if save == &PathBuf::from("product_page_debug.html")
    ));
}

#[test]
fn options_requires_url() {
    assert!(Cli::try_parse_from(["kitscrape-cli", "options"]).is_err());
}

#[test]
fn option_table_listing_shows_buckets_and_sorted_items() {
    let page = r#"<script>goods_sale_prop_str='{"1":{"parent_id":"0","base_name":"Size"},"2":{"parent_id":"1","base_name":"XL","listorder":"2","price":"4.00"},"3":{"parent_id":"1","base_name":"S","listorder":"1"},"4":{"parent_id":"0","base_name":"Color"}}';</script>"#;
    let table = kitscrape_scraper::parse_option_table(page).unwrap();
    let listing = inspect::format_option_table(&table);

    assert!(listing.starts_with("4 option records\n"));
    assert!(listing.contains("[1] Size -> sizes (2 items)"));
    assert!(listing.contains("[4] Color -> (dropped) (0 items)"));
    let s = listing.find("[3] S").unwrap();
    let xl = listing.find("[2] XL").unwrap();
    assert!(s < xl, "items should be listed in listorder:\n{listing}");
}

#[test]
fn summary_report_mentions_missing_title() {
    let summary = kitscrape_scraper::summarize_page(404, "<p>gone</p>");
    let report = inspect::format_summary(&summary);
    assert!(report.contains("status: 404"));
    assert!(report.contains("h1 title: not found"));
    assert!(report.contains("option table: missing"));
}
