//! JSON output files.

use std::path::Path;

use serde::Serialize;

use crate::error::ScraperError;

/// Writes `value` to `path` as pretty-printed UTF-8 JSON with a trailing
/// newline, creating parent directories as needed. Non-ASCII text is written
/// as-is.
///
/// # Errors
///
/// - [`ScraperError::Io`] if the directory or file cannot be created or written.
/// - [`ScraperError::Serialize`] if `value` fails to serialize.
pub async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), ScraperError> {
    let io_err = |source: std::io::Error| ScraperError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut body =
        serde_json::to_vec_pretty(value).map_err(|source| ScraperError::Serialize {
            context: path.display().to_string(),
            source,
        })?;
    body.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, body).await.map_err(io_err)?;

    tracing::debug!(path = %path.display(), "wrote JSON output");
    Ok(())
}
