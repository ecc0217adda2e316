use chrono::{DateTime, Utc};

use super::types::GeodeticPosition;
use super::EARTH_RADIUS_KM;
use crate::feed::StateVector;

/// Magnitude of the velocity vector in km/s.
pub fn speed(vector: &StateVector) -> f64 {
    norm(vector.velocity_km_s)
}

/// Greenwich mean sidereal angle (radians) at `epoch`, IAU 1982 expression
/// counted from J2000. UTC stands in for UT1.
pub fn sidereal_angle(epoch: &DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&epoch.naive_utc()))
}

/// Rotate an inertial position about Z into the Earth-fixed frame.
pub fn eci_to_ecef_position(pos_eci: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_eci[0] * cos_gmst + pos_eci[1] * sin_gmst,
        -pos_eci[0] * sin_gmst + pos_eci[1] * cos_gmst,
        pos_eci[2],
    ]
}

/// Geocentric latitude, longitude in [-180, 180) and altitude above the
/// reference sphere for the state vector's own epoch.
pub fn sub_point(vector: &StateVector) -> GeodeticPosition {
    let ecef = eci_to_ecef_position(vector.position_km, sidereal_angle(&vector.epoch));
    let planar = ecef[0].hypot(ecef[1]);

    let latitude_deg = if planar == 0.0 {
        // On the polar axis.
        if ecef[2] >= 0.0 {
            90.0
        } else {
            -90.0
        }
    } else {
        ecef[2].atan2(planar).to_degrees()
    };

    GeodeticPosition {
        latitude_deg,
        longitude_deg: normalize_longitude(ecef[1].atan2(ecef[0]).to_degrees()),
        altitude_km: norm(vector.position_km) - EARTH_RADIUS_KM,
    }
}

fn normalize_longitude(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
