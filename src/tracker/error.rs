use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ephemeris::LookupError;
use crate::feed::{FetchError, ParseError};
use crate::geolocation::GeolocationError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("no trajectory data loaded")]
    EmptyDataset,
    #[error("no state vector at epoch {0}")]
    NotFound(DateTime<Utc>),
    #[error("geolocation unavailable: {0}")]
    GeolocationUnavailable(#[from] GeolocationError),
}

impl From<LookupError> for TrackerError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::EmptyDataset => TrackerError::EmptyDataset,
            LookupError::NotFound(epoch) => TrackerError::NotFound(epoch),
        }
    }
}
