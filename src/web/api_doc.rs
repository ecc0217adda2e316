use utoipa::OpenApi;

use super::api::dataset::RefreshResponse;
use super::api::error::ErrorResponse;
use crate::feed::{OemHeader, OemMetadata, StateVector};
use crate::geolocation::NamedLocation;
use crate::kinematics::GeodeticPosition;
use crate::tracker::{LocationReport, NowReport, SpeedReport};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::epochs::list_state_vectors,
        super::api::epochs::list_epochs,
        super::api::epochs::get_state_vector,
        super::api::epochs::get_speed,
        super::api::epochs::get_location,
        super::api::epochs::now,
        super::api::dataset::header,
        super::api::dataset::metadata,
        super::api::dataset::comments,
        super::api::dataset::refresh,
        super::api::dataset::clear,
    ),
    components(
        schemas(
            StateVector,
            SpeedReport,
            LocationReport,
            NowReport,
            GeodeticPosition,
            NamedLocation,
            OemHeader,
            OemMetadata,
            RefreshResponse,
            ErrorResponse,
        )
    ),
    info(
        title = "ISS-O-Mat API",
        description = "Trajectory, speed and ground location of the ISS from the public OEM feed",
        version = "0.1.0"
    ),
    tags(
        (name = "epochs", description = "State vector queries"),
        (name = "dataset", description = "Dataset contents and lifecycle")
    )
)]
pub struct ApiDoc;
