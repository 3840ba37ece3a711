use crate::forecast::error::ForecastError;
use crate::geocoding::error::GeocodingError;
use crate::report::row::RowError;
use crate::store::error::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherReportsError {
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Report rows failed validation ({} row(s))", .0.len())]
    Validation(Vec<RowError>),

    #[error("Failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] anyhow::Error),

    #[error("Failed to determine data directory")]
    DataDirResolution(#[source] anyhow::Error),
}
