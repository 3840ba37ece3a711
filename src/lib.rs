mod error;
mod forecast;
mod geocoding;
mod report;
mod store;
mod utils;
mod weather_reports;

pub use error::WeatherReportsError;
pub use weather_reports::*;

pub use geocoding::city_lookup::{CityCandidate, CityLookupClient, CitySearch};
pub use geocoding::debounce::{
    DebouncedSearch, DEFAULT_DEBOUNCE_WINDOW, DEFAULT_RESULT_COUNT, DEFAULT_SEARCH_QUERY,
};
pub use geocoding::error::GeocodingError;

pub use forecast::aggregate::fetch_all;
pub use forecast::client::{ForecastClient, ForecastProvider};
pub use forecast::error::ForecastError;
pub use forecast::series::{ChartPoint, ForecastSeries, WeatherVariable};

pub use report::compose::compose;
pub use report::model::{Report, ReportRow, DISPLAY_DATE_FORMAT};
pub use report::row::{
    resolve_row, resolve_rows, ReportRowInput, ResolvedRow, RowError, SelectedCity,
    MAX_FORECAST_RANGE_DAYS,
};

pub use store::error::StoreError;
pub use store::json_file::JsonFileStore;
pub use store::{MemoryStore, ReportStore};
