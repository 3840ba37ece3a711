use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {0}")]
    ResponseDecode(String, #[source] reqwest::Error),

    #[error(
        "Series length mismatch in forecast response: variable '{variable}' \
         has {found} values for {expected} timestamps"
    )]
    SeriesLengthMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },
}
