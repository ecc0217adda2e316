use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no trajectory data loaded")]
    EmptyDataset,
    #[error("no state vector at epoch {0}")]
    NotFound(DateTime<Utc>),
}
