//! Downloads product images to local files.

use std::path::Path;
use std::time::Duration;

use kitscrape_core::ProductRecord;
use reqwest::Url;

use crate::client::StorefrontClient;
use crate::error::ScraperError;

const DEFAULT_EXTENSION: &str = ".jpg";

/// Downloads every image of `record` into `<image_dir>/<item number>/`,
/// naming files `image_<idx><ext>` by position in the image list.
///
/// Each stored image gets its `local_path` set. A failed download is logged
/// and skipped; the rest of the list is still attempted. `delay_ms` is slept
/// after each successful download. Returns the number of images stored.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] only when the product directory itself
/// cannot be created.
pub async fn download_images(
    client: &StorefrontClient,
    record: &mut ProductRecord,
    image_dir: &Path,
    delay_ms: u64,
) -> Result<usize, ScraperError> {
    if record.images.is_empty() {
        return Ok(0);
    }

    let product_dir = image_dir.join(dir_name(record.image_key()));
    tokio::fs::create_dir_all(&product_dir)
        .await
        .map_err(|source| ScraperError::Io {
            path: product_dir.clone(),
            source,
        })?;

    let mut stored = 0usize;
    for (idx, image) in record.images.iter_mut().enumerate() {
        let path = product_dir.join(format!("image_{idx}{}", extension_of(&image.url)));
        match fetch_to_file(client, &image.url, &path).await {
            Ok(()) => {
                image.local_path = Some(path.display().to_string());
                stored += 1;
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
            Err(e) => {
                tracing::warn!(url = %image.url, error = %e, "image download failed");
            }
        }
    }

    tracing::info!(
        item = record.image_key(),
        stored,
        total = record.images.len(),
        "downloaded product images"
    );
    Ok(stored)
}

async fn fetch_to_file(
    client: &StorefrontClient,
    url: &str,
    path: &Path,
) -> Result<(), ScraperError> {
    let bytes = client.fetch_bytes(url).await?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| ScraperError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// File extension (with the dot) of the URL's path, `.jpg` when there is none.
fn extension_of(url: &str) -> String {
    let path = Url::parse(url).map_or_else(
        |_| url.split(['?', '#']).next().unwrap_or_default().to_owned(),
        |u| u.path().to_owned(),
    );
    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map_or_else(|| DEFAULT_EXTENSION.to_owned(), |e| format!(".{e}"))
}

/// Item numbers become directory names; anything other than letters,
/// digits, `-` and `_` is replaced.
fn dir_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_url_path() {
        assert_eq!(
            extension_of("https://ssl.images-ssl-mars.com/a/b/photo.png"),
            ".png"
        );
        let resized =
            "https://ssl.images-ssl-mars.com/a/photo.webp?x-oss-process=image/resize,w_100";
        assert_eq!(extension_of(resized), ".webp");
    }

    #[test]
    fn missing_extension_defaults_to_jpg() {
        assert_eq!(extension_of("https://ssl.images-ssl-mars.com/a/photo"), ".jpg");
        assert_eq!(extension_of("https://ssl.images-ssl-mars.com/"), ".jpg");
    }

    #[test]
    fn dir_name_keeps_item_numbers() {
        assert_eq!(dir_name("2793324"), "2793324");
        assert_eq!(dir_name("unknown"), "unknown");
    }

    #[test]
    fn dir_name_replaces_path_separators() {
        assert_eq!(dir_name("../etc"), "___etc");
    }
}
