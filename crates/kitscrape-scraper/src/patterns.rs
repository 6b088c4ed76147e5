//! URL and text patterns specific to the storefront's markup.

use std::sync::LazyLock;

use regex::Regex;

/// Path of the HTML site map listing every category.
pub const SITEMAP_PATH: &str = "/h-sitemap-pc.html";

pub(crate) static PRODUCT_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-p\d+\.html").expect("valid product href regex"));
pub(crate) static CATEGORY_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-c\d+\.html").expect("valid category href regex"));
pub(crate) static BRAND_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-b\d+\.html").expect("valid brand href regex"));
pub(crate) static IMAGE_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ssl\.images-ssl-mars\.com").expect("valid image host regex"));
static RESIZE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?x-oss-process=.*$").expect("valid resize suffix regex"));

pub(crate) static ITEM_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)item\s*no\.?\s*[:#]?\s*(\d+)").expect("valid item no regex"));
pub(crate) static GOODS_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"goods_id\s*[:=]\s*["'](\d+)["']"#).expect("valid goods_id regex")
});
pub(crate) static US_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"US\$\s*(\d+(?:\.\d+)?)").expect("valid price regex"));
pub(crate) static PLUS_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\s*US\$\s*(\d+(?:\.\d+)?)").expect("valid delta regex"));
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical regex"));

/// Removes the image host's on-the-fly resize suffix to get the full-size URL.
#[must_use]
pub fn strip_resize_suffix(src: &str) -> String {
    RESIZE_SUFFIX_RE.replace(src, "").into_owned()
}

/// Removes every `( ... )` group and trims, e.g. `"L(+US$3.00)"` → `"L"`.
#[must_use]
pub fn strip_parenthetical(text: &str) -> String {
    PARENTHETICAL_RE.replace_all(text, "").trim().to_string()
}

#[must_use]
pub fn is_product_href(href: &str) -> bool {
    PRODUCT_HREF_RE.is_match(href)
}

#[must_use]
pub fn is_category_href(href: &str) -> bool {
    CATEGORY_HREF_RE.is_match(href)
}

/// Collapses runs of whitespace to single spaces and trims.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_suffix_is_removed() {
        assert_eq!(
            strip_resize_suffix(
                "https://ssl.images-ssl-mars.com/a/b.jpg?x-oss-process=image/resize,w_100"
            ),
            "https://ssl.images-ssl-mars.com/a/b.jpg"
        );
    }

    #[test]
    fn url_without_suffix_is_unchanged() {
        let url = "https://ssl.images-ssl-mars.com/a/b.jpg";
        assert_eq!(strip_resize_suffix(url), url);
    }

    #[test]
    fn parenthetical_is_stripped() {
        assert_eq!(strip_parenthetical("L(+US$3.00)"), "L");
        assert_eq!(strip_parenthetical("XL (+US$ 4.00) "), "XL");
        assert_eq!(strip_parenthetical("M"), "M");
    }

    #[test]
    fn href_classifiers() {
        assert!(is_product_href("/25-26-Man-City-Jersey-p2793324.html"));
        assert!(!is_product_href("/Man-City-c58021.html"));
        assert!(is_category_href("/Man-City-c58021.html"));
        assert!(BRAND_HREF_RE.is_match("/Nike-b12.html"));
    }

    #[test]
    fn item_no_matches_case_insensitively() {
        let caps = ITEM_NO_RE.captures("Home Jersey item no: 12345").unwrap();
        assert_eq!(&caps[1], "12345");
        let caps = ITEM_NO_RE.captures("Jersey Item NO.678").unwrap();
        assert_eq!(&caps[1], "678");
    }

    #[test]
    fn goods_id_matches_quoted_assignment() {
        let caps = GOODS_ID_RE.captures("var goods_id = '2793324';").unwrap();
        assert_eq!(&caps[1], "2793324");
        assert!(GOODS_ID_RE.captures("var goods_id = 2793324;").is_none());
    }

    #[test]
    fn whitespace_is_squashed() {
        assert_eq!(squash_whitespace("  a \n\t b  "), "a b");
    }
}
