//! The persisted report record and its wire shape.

use crate::forecast::series::WeatherVariable;
use crate::report::row::{ReportRowInput, SelectedCity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display format used everywhere a date is shown or persisted.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// A composed weather report, as appended to the persisted list.
///
/// Field names are camelCase on the wire; `coordinates_range` and
/// `date_range` are the pooled bounding ranges across all rows (see
/// [`compose`](crate::report::compose::compose)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: Uuid,
    pub cities: Vec<String>,
    pub coordinates_range: [String; 2],
    pub creation_date: String,
    pub date_range: [String; 2],
    pub included_data: String,
    pub weather_variables: Vec<WeatherVariable>,
    pub report: Vec<ReportRow>,
}

/// One row of a persisted report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub city_name: String,
    pub latitude: String,
    pub longitude: String,
    pub date_range: [String; 2],
}

impl Report {
    /// Rebuilds editable form rows from a saved report, so it can be
    /// re-opened and previewed again.
    pub fn to_row_inputs(&self) -> Result<Vec<ReportRowInput>, chrono::ParseError> {
        self.report
            .iter()
            .map(|row| {
                let start = NaiveDate::parse_from_str(&row.date_range[0], DISPLAY_DATE_FORMAT)?;
                let end = NaiveDate::parse_from_str(&row.date_range[1], DISPLAY_DATE_FORMAT)?;
                Ok(ReportRowInput {
                    latitude: Some(row.latitude.clone()),
                    longitude: Some(row.longitude.clone()),
                    city: Some(SelectedCity {
                        label: row.city_name.clone(),
                        // The stored strings stay authoritative; these parsed
                        // values only back the label's dropdown entry.
                        latitude: row.latitude.parse().unwrap_or_default(),
                        longitude: row.longitude.parse().unwrap_or_default(),
                    }),
                    date_range: (start, end),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::row::resolve_rows;

    fn sample() -> Report {
        Report {
            report_id: Uuid::new_v4(),
            cities: vec!["Riyadh".to_string()],
            coordinates_range: ["24.68773".to_string(), "46.72185".to_string()],
            creation_date: "15/01/2024".to_string(),
            date_range: ["01/01/2024".to_string(), "08/01/2024".to_string()],
            included_data: "Temperature only".to_string(),
            weather_variables: vec![WeatherVariable::Temperature2m],
            report: vec![ReportRow {
                city_name: "Riyadh".to_string(),
                latitude: "24.68773".to_string(),
                longitude: "46.72185".to_string(),
                date_range: ["01/01/2024".to_string(), "08/01/2024".to_string()],
            }],
        }
    }

    #[test]
    fn serializes_camel_case_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("reportId").is_some());
        assert!(value.get("coordinatesRange").is_some());
        assert!(value.get("creationDate").is_some());
        assert!(value.get("includedData").is_some());
        assert!(value.get("weatherVariables").is_some());
        assert_eq!(value["report"][0]["cityName"], "Riyadh");
        assert_eq!(value["weatherVariables"][0], "temperature_2m");
    }

    #[test]
    fn round_trips_through_json() {
        let report = sample();
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn saved_report_reopens_as_valid_rows() {
        let inputs = sample().to_row_inputs().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].latitude.as_deref(), Some("24.68773"));
        assert_eq!(inputs[0].city.as_ref().unwrap().label, "Riyadh");
        // The rebuilt rows pass validation (the stored span is exactly 7 days).
        let resolved = resolve_rows(&inputs).unwrap();
        assert_eq!(resolved[0].latitude, "24.68773");
    }
}
