//! Forecast series data shapes: the time-indexed parallel arrays returned by
//! the forecast API and the flat chart-point records derived from them.

use crate::forecast::error::ForecastError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The hourly weather variables a report can request.
///
/// Serialized with the forecast API's own names, which are also the keys of
/// [`ForecastSeries::values`] and the `category` of derived [`ChartPoint`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherVariable {
    #[serde(rename = "temperature_2m")]
    Temperature2m,
    #[serde(rename = "relativehumidity_2m")]
    RelativeHumidity2m,
}

impl WeatherVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature2m => "temperature_2m",
            WeatherVariable::RelativeHumidity2m => "relativehumidity_2m",
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved row's forecast: a shared timestamp axis plus one equally long
/// value array per requested variable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastSeries {
    pub time: Vec<String>,
    /// Per-variable value arrays, keyed by wire name.
    #[serde(flatten)]
    pub values: BTreeMap<String, Vec<f64>>,
}

/// One chartable record: the shape consumed by any plotting surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: String,
    pub value: f64,
    pub category: String,
}

impl ForecastSeries {
    /// Verifies that every variable array is as long as the time axis.
    pub(crate) fn check_lengths(&self) -> Result<(), ForecastError> {
        for (variable, values) in &self.values {
            if values.len() != self.time.len() {
                return Err(ForecastError::SeriesLengthMismatch {
                    variable: variable.clone(),
                    expected: self.time.len(),
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Flattens the parallel arrays into `|time| × |variables|` chart points,
    /// time-major: all variables for timestamp 0, then all for timestamp 1,
    /// and so on. Within each timestamp the categories follow the order of
    /// `variables`, so the chart series appear in the order they were
    /// requested. Variables absent from the series are skipped.
    pub fn chart_points(&self, variables: &[WeatherVariable]) -> Vec<ChartPoint> {
        let mut points = Vec::with_capacity(self.time.len() * variables.len());
        for (index, time) in self.time.iter().enumerate() {
            for variable in variables {
                let Some(value) = self
                    .values
                    .get(variable.as_str())
                    .and_then(|values| values.get(index))
                else {
                    continue;
                };
                points.push(ChartPoint {
                    time: time.clone(),
                    value: *value,
                    category: variable.to_string(),
                });
            }
        }
        points
    }
}
