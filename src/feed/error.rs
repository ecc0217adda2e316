use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request timed out")]
    Timeout,
    #[error("feed returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("feed request failed: {0}")]
    Network(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status)
        } else {
            FetchError::Network(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("unexpected root element <{0}>, expected <ndm>")]
    UnexpectedRoot(String),
    #[error("state vector {index}: missing {field}")]
    MissingField { index: usize, field: &'static str },
    #[error("state vector {index}: {field} is not a number: {value:?}")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("state vector {index}: invalid epoch {value:?}")]
    InvalidEpoch { index: usize, value: String },
    #[error("state vector {index}: epoch {current} does not follow {previous}")]
    NonIncreasingEpoch {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}
