use super::*;

#[test]
fn site_origin_strips_path_and_query() {
    assert_eq!(
        site_origin("https://www.kkgool1.com/Man-City-c58021.html?page=2"),
        "https://www.kkgool1.com"
    );
}

#[test]
fn site_origin_keeps_port() {
    assert_eq!(
        site_origin("http://127.0.0.1:8080/Shirt-p1.html"),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn site_origin_falls_back_to_split_for_unparseable_url() {
    assert_eq!(site_origin("www.kkgool1.com/Shirt-p1.html"), "www.kkgool1.com/Shirt-p1.html");
    assert_eq!(site_origin("not a url"), "not a url");
}

#[test]
fn extract_domain_strips_scheme_and_path() {
    assert_eq!(
        extract_domain("https://www.kkgool1.com/h-sitemap-pc.html"),
        "www.kkgool1.com"
    );
    assert_eq!(extract_domain("http://shop.example.com"), "shop.example.com");
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("kkgool1.com"), "kkgool1.com");
}

#[test]
fn client_builds_with_custom_user_agent() {
    assert!(StorefrontClient::new(5, "kitscrape-test/0.1").is_ok());
}

#[test]
fn check_url_accepts_http_and_https() {
    assert!(check_url("https://www.kkgool1.com/Shirt-p1.html").is_ok());
    assert!(check_url("http://127.0.0.1:8080/").is_ok());
}

#[test]
fn check_url_rejects_relative_and_other_schemes() {
    let err = check_url("/Shirt-p1.html").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
    assert!(matches!(
        check_url("ftp://www.kkgool1.com/a.jpg"),
        Err(ScraperError::InvalidUrl { .. })
    ));
}
