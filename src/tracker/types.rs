use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

use crate::feed::{parse_epoch, serde_epoch};
use crate::geolocation::NamedLocation;
use crate::kinematics::GeodeticPosition;

/// How a caller names a sample: an exact epoch, or whichever is closest to
/// the current clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochQuery {
    At(DateTime<Utc>),
    Now,
}

impl FromStr for EpochQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("now") {
            return Ok(EpochQuery::Now);
        }
        parse_epoch(s)
            .map(EpochQuery::At)
            .ok_or_else(|| format!("invalid epoch: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SpeedReport {
    #[serde(with = "serde_epoch")]
    #[schema(value_type = String)]
    pub epoch: DateTime<Utc>,
    pub speed_km_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct LocationReport {
    #[serde(with = "serde_epoch")]
    #[schema(value_type = String)]
    pub epoch: DateTime<Utc>,
    #[serde(flatten)]
    pub geodetic: GeodeticPosition,
    pub place: NamedLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct NowReport {
    #[serde(with = "serde_epoch")]
    #[schema(value_type = String)]
    pub closest_epoch: DateTime<Utc>,
    /// Current time minus `closest_epoch`.
    pub time_difference_s: f64,
    pub speed_km_s: f64,
    pub location: LocationReport,
}
