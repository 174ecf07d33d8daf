//! Download of the report PDF.

mod basic;

pub use basic::BasicClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::path::Path;
use tracing::info;

/// Executes HTTP requests for the report download.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// GETs `url` and returns the body, failing on a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Returns true if `source` should be fetched over HTTP rather than read
/// from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Copies the report from `source` (URL or local path) to `dest`.
#[tracing::instrument(skip(client, dest), fields(dest = %dest.display()))]
pub async fn download_report<C: HttpClient>(client: &C, source: &str, dest: &Path) -> Result<u64> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {source}"))?
    };

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    info!(bytes = bytes.len(), "Report saved");
    Ok(bytes.len() as u64)
}
