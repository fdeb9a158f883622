//! Image downloads (portraits and covers)

use crate::url::last_path_segment;
use crate::CrawlerError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Local path for an image: `<dir>/<last path segment of source>`
///
/// Returns None if the source URL has no path segment to use as a name.
pub fn image_destination(dir: &str, source: &Url) -> Option<PathBuf> {
    last_path_segment(source)
        .ok()
        .map(|basename| Path::new(dir).join(basename))
}

/// Streams `source` to `dest`, returning the number of bytes written
///
/// A partially written file is left in place if the transfer fails midway.
pub async fn download_image(client: &Client, source: &Url, dest: &Path) -> Result<u64, CrawlerError> {
    let mut response = client
        .get(source.clone())
        .send()
        .await
        .map_err(|e| CrawlerError::Http {
            url: source.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlerError::Status {
            url: source.to_string(),
            status: status.as_u16(),
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await.map_err(|e| CrawlerError::Http {
        url: source.to_string(),
        source: e,
    })? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
