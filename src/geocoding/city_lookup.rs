//! Client for the Open-Meteo geocoding API, used to turn a free-text city
//! name into a short list of coordinate candidates.

use crate::geocoding::error::GeocodingError;
use log::warn;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);

/// One candidate returned by a city search.
///
/// Candidates are request-scoped: only the name and coordinates of a picked
/// candidate are carried into a report row, the candidate itself is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityCandidate {
    pub id: u64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // The API omits the field entirely when nothing matches.
    #[serde(default)]
    results: Vec<CityCandidate>,
}

/// Capability seam for city search, so consumers like
/// [`DebouncedSearch`](crate::DebouncedSearch) can run against a fake.
pub trait CitySearch: Send + Sync {
    fn search(
        &self,
        name: &str,
        count: u32,
    ) -> impl Future<Output = Result<Vec<CityCandidate>, GeocodingError>> + Send;
}

/// HTTP client for the geocoding `/search` endpoint.
#[derive(Debug)]
pub struct CityLookupClient {
    base_url: String,
    client: reqwest::Client,
}

impl CityLookupClient {
    /// Creates a client against the public Open-Meteo geocoding API.
    pub fn new() -> Result<Self, GeocodingError> {
        Self::with_base_url(DEFAULT_GEOCODING_URL)
    }

    /// Creates a client against a custom base URL (no trailing slash).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GeocodingError::ClientBuild)?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Searches for up to `count` cities matching `name`.
    ///
    /// An empty result set is not an error; the timeout above surfaces as an
    /// ordinary [`GeocodingError::NetworkRequest`].
    pub async fn search(
        &self,
        name: &str,
        count: u32,
    ) -> Result<Vec<CityCandidate>, GeocodingError> {
        let url = format!("{}/search", self.base_url);
        let count = count.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("name", name), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| GeocodingError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    GeocodingError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    GeocodingError::NetworkRequest(url, e)
                });
            }
        };

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ResponseDecode(url, e))?;
        Ok(body.results)
    }

    /// Like [`search`](Self::search), but gives up with
    /// [`GeocodingError::Cancelled`] once `cancel` is triggered, e.g. when the
    /// consuming component is torn down.
    pub async fn search_with_cancel(
        &self,
        name: &str,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<CityCandidate>, GeocodingError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(GeocodingError::Cancelled),
            result = self.search(name, count) => result,
        }
    }
}

impl CitySearch for CityLookupClient {
    async fn search(&self, name: &str, count: u32) -> Result<Vec<CityCandidate>, GeocodingError> {
        CityLookupClient::search(self, name, count).await
    }
}
