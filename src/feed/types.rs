use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::serde_epoch;

/// One trajectory sample: inertial position (km) and velocity (km/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StateVector {
    #[serde(with = "serde_epoch")]
    #[schema(value_type = String, example = "2023-058T12:00:00.000Z")]
    pub epoch: DateTime<Utc>,
    #[schema(value_type = Vec<f64>)]
    pub position_km: [f64; 3],
    #[schema(value_type = Vec<f64>)]
    pub velocity_km_s: [f64; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct OemHeader {
    pub creation_date: Option<String>,
    pub originator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct OemMetadata {
    pub object_name: Option<String>,
    pub object_id: Option<String>,
    pub center_name: Option<String>,
    pub ref_frame: Option<String>,
    pub time_system: Option<String>,
    pub start_time: Option<String>,
    pub stop_time: Option<String>,
}

/// A decoded and validated ephemeris message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OemDocument {
    pub header: OemHeader,
    pub metadata: OemMetadata,
    pub comments: Vec<String>,
    pub state_vectors: Vec<StateVector>,
}
