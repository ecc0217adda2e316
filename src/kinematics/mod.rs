mod geodetic;
mod types;

pub use geodetic::{speed, sub_point};
pub use types::GeodeticPosition;

/// Reference radius for altitude, WGS-84 equatorial (km).
pub const EARTH_RADIUS_KM: f64 = 6378.137;
