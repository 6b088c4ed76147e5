use super::*;

const PAGE: &str = r#"<html><head>
<script>var goods_id = '2793324'; var x = 1;</script>
</head><body>
<div class="crumbs">
  <a href="/">Home</a>
  <a href="/Soccer-Jerseys-c100.html">Soccer Jerseys</a>
  <a href="https://www.kkgool1.com/Man-City-c58021.html"> Man City </a>
</div>
<h1>  25-26 Man City Special Edition  </h1>
<a href="/Nike-b12.html">Nike</a>
<ul class="info">
  <li><span>Weight:</span><span> 0.3 kg </span></li>
  <li><span>Sold: 1,204 pcs</span></li>
</ul>
<div class="price">US$ 19.90</div>
<img src="https://ssl.images-ssl-mars.com/a/1.jpg?x-oss-process=image/resize,w_200" alt="front">
<img src="https://ssl.images-ssl-mars.com/a/1.jpg?x-oss-process=image/resize,w_800" alt="front big">
<img src="https://ssl.images-ssl-mars.com/a/2.jpg" alt="back">
<img src="https://cdn.other.com/logo.png" alt="logo">
<div class="goods-detail">Breathable   fabric.
  Fan version.</div>
<table>
  <tr><td>Material</td><td>Polyester</td></tr>
  <tr><td>Season</td><td>24-25</td></tr>
  <tr><td>Season</td><td>25-26</td></tr>
  <tr><td>only one cell</td></tr>
  <tr><td>a</td><td>b</td><td>c</td></tr>
</table>
</body></html>"#;

fn page() -> Html {
    Html::parse_document(PAGE)
}

#[test]
fn title_is_first_h1_trimmed() {
    assert_eq!(title(&page()).as_deref(), Some("25-26 Man City Special Edition"));
}

#[test]
fn title_missing_is_none() {
    assert!(title(&Html::parse_document("<p>no heading</p>")).is_none());
}

#[test]
fn item_number_prefers_title_pattern() {
    assert_eq!(
        item_number(&page(), Some("Jersey Item NO: 555")).as_deref(),
        Some("555")
    );
}

#[test]
fn item_number_falls_back_to_goods_id_script() {
    assert_eq!(
        item_number(&page(), Some("Jersey without number")).as_deref(),
        Some("2793324")
    );
}

#[test]
fn item_number_absent_everywhere_is_none() {
    let doc = Html::parse_document("<script>var other = '1';</script>");
    assert!(item_number(&doc, None).is_none());
}

#[test]
fn brand_comes_from_brand_link() {
    assert_eq!(brand(&page()).as_deref(), Some("Nike"));
}

#[test]
fn weight_reads_following_sibling() {
    assert_eq!(weight(&page()).as_deref(), Some("0.3 kg"));
}

#[test]
fn sold_count_reads_first_digits() {
    assert_eq!(sold_count(&page()), Some(1));
}

#[test]
fn sold_count_without_digits_is_absent() {
    let doc = Html::parse_document("<div><span>Sold out</span></div>");
    assert_eq!(sold_count(&doc), None);
}

#[test]
fn sales_label_is_recognised() {
    let doc = Html::parse_document("<div><span>Sales 87</span></div>");
    assert_eq!(sold_count(&doc), Some(87));
}

#[test]
fn images_are_full_resolution_and_unique() {
    let imgs = images(&page());
    let urls: Vec<&str> = imgs.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://ssl.images-ssl-mars.com/a/1.jpg",
            "https://ssl.images-ssl-mars.com/a/2.jpg",
        ]
    );
    assert_eq!(imgs[0].alt, "front");
    assert_eq!(
        imgs[0].thumbnail.as_deref(),
        Some("https://ssl.images-ssl-mars.com/a/1.jpg?x-oss-process=image/resize,w_200")
    );
}

#[test]
fn description_is_squashed_text_of_detail_element() {
    assert_eq!(description(&page()), "Breathable fabric. Fan version.");
}

#[test]
fn description_missing_is_empty() {
    assert_eq!(description(&Html::parse_document("<p>x</p>")), "");
}

#[test]
fn specifications_keep_two_cell_rows_and_last_duplicate() {
    let specs = specifications(&page());
    assert_eq!(specs.len(), 2);
    assert_eq!(specs["Material"], "Polyester");
    assert_eq!(specs["Season"], "25-26");
}

#[test]
fn breadcrumb_is_category_links_made_absolute() {
    let crumbs = breadcrumb(&page(), "https://www.kkgool1.com/Jersey-p2793324.html");
    assert_eq!(
        crumbs,
        vec![
            Crumb {
                name: "Soccer Jerseys".to_string(),
                url: "https://www.kkgool1.com/Soccer-Jerseys-c100.html".to_string(),
            },
            Crumb {
                name: "Man City".to_string(),
                url: "https://www.kkgool1.com/Man-City-c58021.html".to_string(),
            },
        ]
    );
}

#[test]
fn pricing_reads_first_us_dollar_amount() {
    let pricing = pricing(&page()).unwrap();
    assert_eq!(pricing.base_price, Decimal::new(1990, 2));
    assert_eq!(pricing.currency, "USD");
}

#[test]
fn pricing_skips_option_deltas() {
    let doc = Html::parse_document("<a>L(+US$3.00)</a><span>US$25.00</span>");
    assert_eq!(pricing(&doc).unwrap().base_price, Decimal::new(2500, 2));
}

#[test]
fn absolutize_keeps_href_without_base() {
    assert_eq!(absolutize(None, "/x-c1.html"), "/x-c1.html");
}
