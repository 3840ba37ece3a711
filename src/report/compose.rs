//! Deriving report-level summary metadata from resolved rows.

use crate::forecast::series::WeatherVariable;
use crate::report::model::{Report, ReportRow, DISPLAY_DATE_FORMAT};
use crate::report::row::ResolvedRow;
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use uuid::Uuid;

/// Composes a report from resolved rows and the shared variable selection.
///
/// `coordinates_range` pools every row's latitude AND longitude into one
/// numeric list and takes the `[min, max]` of the whole pool. Mixing the two
/// axes into a single range is deliberate current behavior, kept as-is.
/// `date_range` likewise pools all rows' boundary dates and takes the
/// calendar `[min, max]`.
pub fn compose(
    rows: &[ResolvedRow],
    variables: &[WeatherVariable],
    created_on: NaiveDate,
) -> Report {
    let cities = rows
        .iter()
        .map(|row| row.city_label.clone().unwrap_or_default())
        .collect();

    let pooled: Vec<OrderedFloat<f64>> = rows
        .iter()
        .flat_map(|row| [row.latitude.as_str(), row.longitude.as_str()])
        .filter_map(|value| value.parse::<f64>().ok().map(OrderedFloat))
        .collect();
    let coordinates_range = match (pooled.iter().min(), pooled.iter().max()) {
        (Some(min), Some(max)) => [min.to_string(), max.to_string()],
        _ => [String::from("0"), String::from("0")],
    };

    let dates: Vec<NaiveDate> = rows
        .iter()
        .flat_map(|row| [row.date_range.0, row.date_range.1])
        .collect();
    let date_range = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => [
            min.format(DISPLAY_DATE_FORMAT).to_string(),
            max.format(DISPLAY_DATE_FORMAT).to_string(),
        ],
        _ => {
            let today = created_on.format(DISPLAY_DATE_FORMAT).to_string();
            [today.clone(), today]
        }
    };

    Report {
        report_id: Uuid::new_v4(),
        cities,
        coordinates_range,
        creation_date: created_on.format(DISPLAY_DATE_FORMAT).to_string(),
        date_range,
        included_data: included_data_label(variables).to_string(),
        weather_variables: variables.to_vec(),
        report: rows
            .iter()
            .map(|row| ReportRow {
                city_name: row.city_label.clone().unwrap_or_default(),
                latitude: row.latitude.clone(),
                longitude: row.longitude.clone(),
                date_range: [
                    row.date_range.0.format(DISPLAY_DATE_FORMAT).to_string(),
                    row.date_range.1.format(DISPLAY_DATE_FORMAT).to_string(),
                ],
            })
            .collect(),
    }
}

fn included_data_label(variables: &[WeatherVariable]) -> &'static str {
    if variables.len() == 2 {
        "Temperature and relative humidity"
    } else if variables.first() == Some(&WeatherVariable::Temperature2m) {
        "Temperature only"
    } else {
        "Relative humidity only"
    }
}
