//! Resolving one report row's heterogeneous input (explicit coordinates or a
//! picked city) into a canonical coordinate pair, with date-range validation.

use crate::geocoding::city_lookup::CityCandidate;
use chrono::NaiveDate;
use thiserror::Error;

/// Maximum forecast span per row, inclusive: exactly this many days is valid.
pub const MAX_FORECAST_RANGE_DAYS: i64 = 7;

pub(crate) const MISSING_CITY_MESSAGE: &str = "City or coordinates is required";
pub(crate) const RANGE_TOO_WIDE_MESSAGE: &str = "Date range must be within 7 days";
pub(crate) const RANGE_INVERTED_MESSAGE: &str = "Date range end must not precede start";

/// The city a user picked from the search dropdown, captured into a row.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCity {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&CityCandidate> for SelectedCity {
    fn from(candidate: &CityCandidate) -> Self {
        Self {
            label: candidate.name.clone(),
            latitude: candidate.latitude,
            longitude: candidate.longitude,
        }
    }
}

impl From<CityCandidate> for SelectedCity {
    fn from(candidate: CityCandidate) -> Self {
        Self::from(&candidate)
    }
}

/// One form row as entered by the user. At least one of the explicit
/// coordinate pair and the selected city must be present; empty strings count
/// as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRowInput {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub city: Option<SelectedCity>,
    pub date_range: (NaiveDate, NaiveDate),
}

impl ReportRowInput {
    pub fn from_city(city: impl Into<SelectedCity>, date_range: (NaiveDate, NaiveDate)) -> Self {
        Self {
            latitude: None,
            longitude: None,
            city: Some(city.into()),
            date_range,
        }
    }

    pub fn from_coordinates(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        date_range: (NaiveDate, NaiveDate),
    ) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            city: None,
            date_range,
        }
    }
}

/// A validated row, ready for forecast fetching and report composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    /// The selected city's label; absent for explicit-coordinate-only rows.
    pub city_label: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub date_range: (NaiveDate, NaiveDate),
}

/// A per-row validation failure, attributed to the row's index so several
/// rows can report independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {message}")]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    fn new(row: usize, message: &str) -> Self {
        Self {
            row,
            message: message.to_string(),
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Resolves a single row.
///
/// Explicit coordinates take precedence over the selected city's and are used
/// verbatim; otherwise the city's coordinates are formatted into strings.
pub fn resolve_row(index: usize, input: &ReportRowInput) -> Result<ResolvedRow, RowError> {
    let has_coordinates = present(&input.latitude) && present(&input.longitude);
    if !has_coordinates && input.city.is_none() {
        return Err(RowError::new(index, MISSING_CITY_MESSAGE));
    }

    let (start, end) = input.date_range;
    if end < start {
        return Err(RowError::new(index, RANGE_INVERTED_MESSAGE));
    }
    if (end - start).num_days() > MAX_FORECAST_RANGE_DAYS {
        return Err(RowError::new(index, RANGE_TOO_WIDE_MESSAGE));
    }

    let (latitude, longitude) = if has_coordinates {
        (
            input.latitude.clone().unwrap_or_default(),
            input.longitude.clone().unwrap_or_default(),
        )
    } else {
        // Checked above: no explicit coordinates implies a selected city.
        let city = input.city.as_ref().ok_or_else(|| RowError::new(index, MISSING_CITY_MESSAGE))?;
        (city.latitude.to_string(), city.longitude.to_string())
    };

    Ok(ResolvedRow {
        city_label: input.city.as_ref().map(|c| c.label.clone()),
        latitude,
        longitude,
        date_range: input.date_range,
    })
}

/// Resolves every row, collecting all failures instead of stopping at the
/// first so each invalid row gets its own message.
pub fn resolve_rows(rows: &[ReportRowInput]) -> Result<Vec<ResolvedRow>, Vec<RowError>> {
    let mut resolved = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    for (index, input) in rows.iter().enumerate() {
        match resolve_row(index, input) {
            Ok(row) => resolved.push(row),
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week() -> (NaiveDate, NaiveDate) {
        (date(2024, 1, 1), date(2024, 1, 4))
    }

    fn riyadh() -> SelectedCity {
        SelectedCity {
            label: "Riyadh".to_string(),
            latitude: 24.68773,
            longitude: 46.72185,
        }
    }

    #[test]
    fn explicit_coordinates_take_precedence_over_city() {
        let mut input = ReportRowInput::from_city(riyadh(), week());
        input.latitude = Some("10.5".to_string());
        input.longitude = Some("-3.25".to_string());
        let row = resolve_row(0, &input).unwrap();
        assert_eq!(row.latitude, "10.5");
        assert_eq!(row.longitude, "-3.25");
        // The label still comes from the selected city.
        assert_eq!(row.city_label.as_deref(), Some("Riyadh"));
    }

    #[test]
    fn partial_explicit_coordinates_fall_back_to_city() {
        let mut input = ReportRowInput::from_city(riyadh(), week());
        input.latitude = Some("10.5".to_string());
        let row = resolve_row(0, &input).unwrap();
        assert_eq!(row.latitude, "24.68773");
        assert_eq!(row.longitude, "46.72185");
    }

    #[test]
    fn empty_strings_count_as_absent_coordinates() {
        let input = ReportRowInput {
            latitude: Some(String::new()),
            longitude: Some(String::new()),
            city: None,
            date_range: week(),
        };
        let err = resolve_row(3, &input).unwrap_err();
        assert_eq!(err.row, 3);
        assert_eq!(err.message, MISSING_CITY_MESSAGE);
    }

    #[test]
    fn coordinate_only_row_has_no_label() {
        let input = ReportRowInput::from_coordinates("1.0", "2.0", week());
        let row = resolve_row(0, &input).unwrap();
        assert_eq!(row.city_label, None);
    }

    #[test]
    fn span_of_exactly_seven_days_is_accepted() {
        let input = ReportRowInput::from_coordinates("1", "2", (date(2024, 1, 1), date(2024, 1, 8)));
        assert!(resolve_row(0, &input).is_ok());
    }

    #[test]
    fn span_of_eight_days_is_rejected() {
        let input = ReportRowInput::from_coordinates("1", "2", (date(2024, 1, 1), date(2024, 1, 9)));
        let err = resolve_row(0, &input).unwrap_err();
        assert_eq!(err.message, RANGE_TOO_WIDE_MESSAGE);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let input = ReportRowInput::from_coordinates("1", "2", (date(2024, 1, 5), date(2024, 1, 4)));
        let err = resolve_row(0, &input).unwrap_err();
        assert_eq!(err.message, RANGE_INVERTED_MESSAGE);
    }

    #[test]
    fn same_day_range_is_accepted() {
        let input = ReportRowInput::from_coordinates("1", "2", (date(2024, 1, 5), date(2024, 1, 5)));
        assert!(resolve_row(0, &input).is_ok());
    }

    #[test]
    fn all_invalid_rows_report_independently() {
        let rows = vec![
            ReportRowInput {
                latitude: None,
                longitude: None,
                city: None,
                date_range: week(),
            },
            ReportRowInput::from_city(riyadh(), week()),
            ReportRowInput::from_coordinates("1", "2", (date(2024, 1, 1), date(2024, 1, 20))),
        ];
        let errors = resolve_rows(&rows).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].row, 0);
        assert_eq!(errors[0].message, MISSING_CITY_MESSAGE);
        assert_eq!(errors[1].row, 2);
        assert_eq!(errors[1].message, RANGE_TOO_WIDE_MESSAGE);
    }

    #[test]
    fn valid_rows_resolve_in_order() {
        let rows = vec![
            ReportRowInput::from_city(riyadh(), week()),
            ReportRowInput::from_coordinates("52.52", "13.40", week()),
        ];
        let resolved = resolve_rows(&rows).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].city_label.as_deref(), Some("Riyadh"));
        assert_eq!(resolved[1].latitude, "52.52");
    }
}
