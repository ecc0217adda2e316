mod error;
mod tracker;
mod types;

pub use error::TrackerError;
pub use tracker::Tracker;
pub use types::{EpochQuery, LocationReport, NowReport, SpeedReport};

#[cfg(test)]
pub(crate) mod testing;
