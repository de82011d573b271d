//! Region data sources.
//!
//! [`RegionSource`] is the port the cache fetches through;
//! [`HttpRegionSource`] wraps the public region API
//! (`{base}/provinsi.json`, `{base}/kabupaten/{id}.json`) using [`reqwest`].

use async_trait::async_trait;
use sketchform_core::region::{normalize_payload, validate_region_id, Region, SubRegion};

use crate::error::RegionFetchError;

/// Default base URL of the public Indonesian region data set.
pub const DEFAULT_BASE_URL: &str = "https://ibnux.github.io/data-indonesia";

/// Where province and city/regency lists come from.
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// Fetch the top-level province list.
    async fn fetch_regions(&self) -> Result<Vec<Region>, RegionFetchError>;

    /// Fetch the cities/regencies of one province.
    async fn fetch_sub_regions(&self, region_id: &str) -> Result<Vec<SubRegion>, RegionFetchError>;
}

/// HTTP client for the region JSON API.
pub struct HttpRegionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegionSource {
    /// Create a source for the given base URL, e.g.
    /// `https://ibnux.github.io/data-indonesia`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a source reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_list(&self, url: String) -> Result<Vec<Region>, RegionFetchError> {
        tracing::debug!(%url, "Fetching region list");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RegionFetchError::Parse(e.to_string()))?;

        Ok(normalize_payload(&payload)?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`RegionFetchError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RegionFetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RegionFetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RegionSource for HttpRegionSource {
    async fn fetch_regions(&self) -> Result<Vec<Region>, RegionFetchError> {
        self.get_list(format!("{}/provinsi.json", self.base_url)).await
    }

    async fn fetch_sub_regions(&self, region_id: &str) -> Result<Vec<SubRegion>, RegionFetchError> {
        validate_region_id(region_id)
            .map_err(|_| RegionFetchError::InvalidId(region_id.to_string()))?;
        self.get_list(format!("{}/kabupaten/{}.json", self.base_url, region_id))
            .await
    }
}
