//! Origin and host helpers for storefront URLs.

/// Scheme and host of `page_url`, e.g. `https://www.kkgool1.com` for any
/// product or category page on that storefront.
///
/// Falls back to the first three `/`-separated parts when the URL does not
/// parse.
#[must_use]
pub fn site_origin(page_url: &str) -> String {
    reqwest::Url::parse(page_url).map_or_else(
        |e| {
            tracing::warn!(
                page_url,
                error = %e,
                "could not parse page URL, splitting on '/' for origin"
            );
            page_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Hostname of `url` for error messages; the whole string when it does not
/// parse.
pub(super) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
