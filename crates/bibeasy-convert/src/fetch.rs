//! Remote fetch of the publications sheet.
//!
//! The sheet lives in a published Google Sheet with one tab per
//! publication type. Each tab is fetched through the CSV export endpoint
//! and cached under the platform cache directory so later commands can
//! run offline.

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bibeasy_core::model::PubType;

use crate::error::ConvertResult;

/// HTTP client for the published Google Sheet.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: Client,
}

impl SheetClient {
    /// Create a new sheet client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("bibeasy/0.1.0 (https://github.com/neuropoly/bibeasy)")
            .build()?;

        Ok(Self { http })
    }

    /// Fetch one tab of the sheet as CSV text.
    ///
    /// Uses the gviz CSV export endpoint, which selects a tab by name.
    ///
    /// # Errors
    /// Returns an error if the request fails or the sheet is not public.
    pub async fn fetch_tab(&self, sheet_url: &str, tab: &str) -> ConvertResult<String> {
        let url = format!(
            "{}/gviz/tq?tqx=out:csv&sheet={}",
            sheet_url.trim_end_matches('/'),
            tab
        );

        log::info!("Fetching sheet tab '{}' from {}", tab, sheet_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        Ok(body)
    }

    /// Fetch every requested tab and cache the CSV bodies under
    /// `cache_dir` as `<type>.csv`. Returns the number of tabs cached.
    ///
    /// # Errors
    /// Returns an error on the first tab that cannot be fetched or written.
    pub async fn refresh_cache(
        &self,
        sheet_url: &str,
        types: &[PubType],
        cache_dir: &Path,
    ) -> ConvertResult<usize> {
        std::fs::create_dir_all(cache_dir)?;

        let mut count = 0;
        for &pub_type in types {
            let body = self.fetch_tab(sheet_url, pub_type.name()).await?;
            let path = cached_tab_path(cache_dir, pub_type);
            std::fs::write(&path, &body)?;
            log::info!("Cached '{}' tab at {}", pub_type, path.display());
            count += 1;
        }

        Ok(count)
    }
}

/// Path of the cached CSV for one publication type.
#[must_use]
pub fn cached_tab_path(cache_dir: &Path, pub_type: PubType) -> PathBuf {
    cache_dir.join(format!("{}.csv", pub_type.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_client_creation() {
        let client = SheetClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_cached_tab_path() {
        let path = cached_tab_path(Path::new("/tmp/cache"), PubType::Article);
        assert_eq!(path, PathBuf::from("/tmp/cache/article.csv"));
    }
}
