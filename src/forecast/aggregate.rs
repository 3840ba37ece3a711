//! Concurrent fan-out of per-row forecast requests.

use crate::forecast::client::ForecastProvider;
use crate::forecast::error::ForecastError;
use crate::forecast::series::{ForecastSeries, WeatherVariable};
use crate::report::row::ResolvedRow;
use futures_util::future::try_join_all;
use log::info;

/// Fetches one forecast per resolved row, all dispatched concurrently.
///
/// The join is all-or-nothing: the first failure fails the whole call and no
/// partial results are surfaced. On success the series come back in row
/// order, regardless of the order in which the requests completed.
pub async fn fetch_all<P>(
    provider: &P,
    rows: &[ResolvedRow],
    variables: &[WeatherVariable],
) -> Result<Vec<ForecastSeries>, ForecastError>
where
    P: ForecastProvider,
{
    let requests = rows.iter().map(|row| {
        let (start_date, end_date) = row.date_range;
        provider.fetch_hourly(&row.latitude, &row.longitude, start_date, end_date, variables)
    });
    let series = try_join_all(requests).await?;
    info!(
        "Fetched forecasts for {} row(s), {} variable(s)",
        series.len(),
        variables.len()
    );
    Ok(series)
}
