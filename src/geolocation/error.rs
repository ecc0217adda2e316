use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("reverse geocoding timed out")]
    Timeout,
    #[error("reverse geocoding returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("reverse geocoding request failed: {0}")]
    Request(reqwest::Error),
    #[error("unexpected reverse geocoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GeolocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeolocationError::Timeout
        } else if let Some(status) = err.status() {
            GeolocationError::Status(status)
        } else {
            GeolocationError::Request(err)
        }
    }
}
