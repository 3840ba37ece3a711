//! Client for the Open-Meteo forecast API.

use crate::forecast::error::ForecastError;
use crate::forecast::series::{ForecastSeries, WeatherVariable};
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);
const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: ForecastSeries,
}

/// Capability seam for fetching one row's forecast, so the aggregation join
/// can be exercised with a fake provider.
pub trait ForecastProvider: Send + Sync {
    fn fetch_hourly(
        &self,
        latitude: &str,
        longitude: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        variables: &[WeatherVariable],
    ) -> impl Future<Output = Result<ForecastSeries, ForecastError>> + Send;
}

/// HTTP client for the forecast `/forecast` endpoint.
#[derive(Debug)]
pub struct ForecastClient {
    base_url: String,
    client: reqwest::Client,
}

impl ForecastClient {
    pub fn new() -> Result<Self, ForecastError> {
        Self::with_base_url(DEFAULT_FORECAST_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ForecastError::ClientBuild)?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Fetches the hourly series for one coordinate pair and date range.
    ///
    /// Coordinates are passed through verbatim as strings; dates go over the
    /// wire as `YYYY-MM-DD`. The returned series is checked for equal array
    /// lengths before it is handed out.
    pub async fn fetch_hourly(
        &self,
        latitude: &str,
        longitude: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        variables: &[WeatherVariable],
    ) -> Result<ForecastSeries, ForecastError> {
        let url = format!("{}/forecast", self.base_url);
        let hourly = variables
            .iter()
            .map(WeatherVariable::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let start_date = start_date.format(WIRE_DATE_FORMAT).to_string();
        let end_date = end_date.format(WIRE_DATE_FORMAT).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude),
                ("longitude", longitude),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("hourly", hourly.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ForecastError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ForecastError::NetworkRequest(url, e)
                });
            }
        };

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::ResponseDecode(url, e))?;
        body.hourly.check_lengths()?;
        Ok(body.hourly)
    }
}

impl ForecastProvider for ForecastClient {
    async fn fetch_hourly(
        &self,
        latitude: &str,
        longitude: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        variables: &[WeatherVariable],
    ) -> Result<ForecastSeries, ForecastError> {
        ForecastClient::fetch_hourly(self, latitude, longitude, start_date, end_date, variables)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_forecast_wire_shape() {
        let payload = r#"{
            "latitude": 24.6875,
            "longitude": 46.75,
            "generationtime_ms": 0.3,
            "utc_offset_seconds": 0,
            "timezone": "GMT",
            "timezone_abbreviation": "GMT",
            "elevation": 612.0,
            "hourly_units": {"time": "iso8601", "temperature_2m": "°C"},
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "temperature_2m": [14.2, 13.8]
            }
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.hourly.time.len(), 2);
        assert_eq!(parsed.hourly.values["temperature_2m"], vec![14.2, 13.8]);
        // hourly_units and the scalar metadata are not part of the series map.
        assert_eq!(parsed.hourly.values.len(), 1);
    }
}
