//! This module provides the main entry point for composing weather reports.
//! It ties together city lookup, per-row validation, concurrent forecast
//! aggregation and the persisted report list.

use crate::error::WeatherReportsError;
use crate::forecast::aggregate::fetch_all;
use crate::forecast::client::ForecastClient;
use crate::forecast::series::{ForecastSeries, WeatherVariable};
use crate::geocoding::city_lookup::{CityCandidate, CityLookupClient};
use crate::geocoding::debounce::DEFAULT_RESULT_COUNT;
use crate::report::compose::compose;
use crate::report::model::Report;
use crate::report::row::{resolve_rows, ReportRowInput};
use crate::store::json_file::JsonFileStore;
use crate::store::ReportStore;
use crate::utils::{ensure_data_dir_exists, get_data_dir};
use bon::bon;
use chrono::Local;
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

/// The main client for composing, previewing and persisting weather reports.
///
/// Wraps the Open-Meteo geocoding and forecast APIs plus a file-backed report
/// store. Create an instance with [`WeatherReports::new()`] for the default
/// data directory or [`WeatherReports::with_data_folder()`] for a custom one.
///
/// # Examples
///
/// ```no_run
/// # use weather_reports::{WeatherReports, WeatherReportsError};
/// # async fn run() -> Result<(), WeatherReportsError> {
/// let client = WeatherReports::new().await?;
/// let cities = client.search_cities().name("Riyadh").call().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WeatherReports {
    lookup: CityLookupClient,
    forecast: ForecastClient,
    store: JsonFileStore,
}

#[bon]
impl WeatherReports {
    /// Creates a client that keeps its report list under the given folder.
    ///
    /// The folder is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherReportsError::DataDirCreation`] if the folder cannot
    /// be created, or a client-build error if the HTTP clients cannot be
    /// constructed.
    pub async fn with_data_folder(data_folder: PathBuf) -> Result<Self, WeatherReportsError> {
        ensure_data_dir_exists(&data_folder)
            .await
            .map_err(|e| WeatherReportsError::DataDirCreation(data_folder.clone(), e))?;
        Ok(Self {
            lookup: CityLookupClient::new()?,
            forecast: ForecastClient::new()?,
            store: JsonFileStore::new(&data_folder),
        })
    }

    /// Creates a client using the default per-user data directory
    /// (determined via the `dirs` crate).
    ///
    /// # Errors
    ///
    /// Returns [`WeatherReportsError::DataDirResolution`] if the default data
    /// directory cannot be determined, or the same errors as
    /// [`with_data_folder`](Self::with_data_folder).
    pub async fn new() -> Result<Self, WeatherReportsError> {
        let data_folder = get_data_dir().map_err(WeatherReportsError::DataDirResolution)?;
        Self::with_data_folder(data_folder).await
    }

    /// Searches for city candidates by free-text name.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.name(&str)`: **Required.** The free-text city name to search for.
    /// * `.count(u32)`: Optional. Maximum number of candidates. Defaults to `5`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weather_reports::{WeatherReports, WeatherReportsError};
    /// # async fn run() -> Result<(), WeatherReportsError> {
    /// let client = WeatherReports::new().await?;
    /// let cities = client.search_cities().name("Ber").count(10).call().await?;
    /// for city in &cities {
    ///     println!("{} ({}, {})", city.name, city.latitude, city.longitude);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn search_cities(
        &self,
        name: &str,
        count: Option<u32>,
    ) -> Result<Vec<CityCandidate>, WeatherReportsError> {
        let count = count.unwrap_or(DEFAULT_RESULT_COUNT);
        Ok(self.lookup.search(name, count).await?)
    }

    /// Validates the given rows and fetches one forecast series per row,
    /// concurrently and all-or-nothing.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.rows(&[ReportRowInput])`: **Required.** The form rows to resolve.
    /// * `.variables(&[WeatherVariable])`: **Required.** The shared variable
    ///   selection, applied to every row.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherReportsError::Validation`] with one entry per invalid
    /// row, or [`WeatherReportsError::Forecast`] if any row's fetch fails (no
    /// partial results are surfaced).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weather_reports::{ReportRowInput, WeatherReports, WeatherReportsError, WeatherVariable};
    /// # use chrono::NaiveDate;
    /// # async fn run() -> Result<(), WeatherReportsError> {
    /// let client = WeatherReports::new().await?;
    /// let rows = vec![ReportRowInput::from_coordinates(
    ///     "52.52",
    ///     "13.40",
    ///     (
    ///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///         NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    ///     ),
    /// )];
    /// let variables = [WeatherVariable::Temperature2m];
    /// let series = client
    ///     .preview()
    ///     .rows(&rows)
    ///     .variables(&variables)
    ///     .call()
    ///     .await?;
    /// let points = series[0].chart_points(&variables);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn preview(
        &self,
        rows: &[ReportRowInput],
        variables: &[WeatherVariable],
    ) -> Result<Vec<ForecastSeries>, WeatherReportsError> {
        let resolved = resolve_rows(rows).map_err(WeatherReportsError::Validation)?;
        Ok(fetch_all(&self.forecast, &resolved, variables).await?)
    }

    /// Validates the rows, composes a report (summary metadata, fresh id,
    /// today's date) and prepends it to the persisted list.
    ///
    /// This method uses a builder pattern; arguments are the same as
    /// [`preview`](Self::preview). Returns the stored [`Report`].
    #[builder]
    pub async fn save_report(
        &self,
        rows: &[ReportRowInput],
        variables: &[WeatherVariable],
    ) -> Result<Report, WeatherReportsError> {
        let resolved = resolve_rows(rows).map_err(WeatherReportsError::Validation)?;
        let report = compose(&resolved, variables, Local::now().date_naive());

        let mut stored = self.store.read_all().await?;
        stored.insert(0, report.clone());
        self.store.write_all(&stored).await?;
        info!(
            "Saved report {} with {} row(s)",
            report.report_id,
            report.report.len()
        );
        Ok(report)
    }

    /// Reads the full persisted report list, most recent first.
    pub async fn reports(&self) -> Result<Vec<Report>, WeatherReportsError> {
        Ok(self.store.read_all().await?)
    }

    /// Looks up one saved report by id.
    pub async fn find_report(&self, id: Uuid) -> Result<Option<Report>, WeatherReportsError> {
        let reports = self.store.read_all().await?;
        Ok(reports.into_iter().find(|report| report.report_id == id))
    }

    /// Deletes the reports with the given ids and returns the remaining list.
    pub async fn delete_reports(&self, ids: &[Uuid]) -> Result<Vec<Report>, WeatherReportsError> {
        let remaining = self.store.delete_by_ids(ids).await?;
        info!("Deleted {} report(s)", ids.len());
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(label: &str) -> Vec<ReportRowInput> {
        vec![ReportRowInput::from_coordinates(
            label,
            "46.7",
            (
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ),
        )]
    }

    async fn client(dir: &tempfile::TempDir) -> WeatherReports {
        WeatherReports::with_data_folder(dir.path().to_path_buf())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn data_folder_blocked_by_a_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports-dir");
        tokio::fs::write(&path, b"not a directory").await.unwrap();
        let err = WeatherReports::with_data_folder(path).await.unwrap_err();
        assert!(matches!(err, WeatherReportsError::DataDirCreation(..)));
    }

    #[tokio::test]
    async fn saved_report_is_prepended_to_the_list() -> Result<(), WeatherReportsError> {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;
        let variables = [WeatherVariable::Temperature2m];

        let first = client
            .save_report()
            .rows(&rows("10"))
            .variables(&variables)
            .call()
            .await?;
        let second = client
            .save_report()
            .rows(&rows("20"))
            .variables(&variables)
            .call()
            .await?;

        let all = client.reports().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].report_id, second.report_id);
        assert_eq!(all[1].report_id, first.report_id);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_rows_fail_save_with_row_errors() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;
        let invalid = vec![ReportRowInput {
            latitude: None,
            longitude: None,
            city: None,
            date_range: (
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ),
        }];
        let result = client
            .save_report()
            .rows(&invalid)
            .variables(&[WeatherVariable::Temperature2m])
            .call()
            .await;
        match result {
            Err(WeatherReportsError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].row, 0);
            }
            other => panic!("expected validation failure, got {:?}", other.map(|r| r.report_id)),
        }
        // Nothing was persisted.
        assert!(client.reports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_and_delete_round_trip() -> Result<(), WeatherReportsError> {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir).await;
        let variables = [WeatherVariable::Temperature2m];

        let report = client
            .save_report()
            .rows(&rows("10"))
            .variables(&variables)
            .call()
            .await?;

        let found = client.find_report(report.report_id).await?;
        assert_eq!(found.as_ref().map(|r| r.report_id), Some(report.report_id));
        assert!(client.find_report(Uuid::new_v4()).await?.is_none());

        let remaining = client.delete_reports(&[report.report_id]).await?;
        assert!(remaining.is_empty());
        assert!(client.reports().await?.is_empty());
        Ok(())
    }
}
