//! Geodesy and plausibility helpers shared by the extractors and filters
//!
//! Contains the haversine distance and the coordinate validity predicates
//! used to admit GPS candidates read from raw floats.

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Plausible altitude range in meters
pub const MIN_ALTITUDE_M: f64 = -500.0;
pub const MAX_ALTITUDE_M: f64 = 10_000.0;

/// Both coordinates below this magnitude are treated as an uninitialized fix
const NEAR_ZERO_DEGREES: f64 = 0.01;

/// Great-circle distance in kilometers
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in meters
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_km(lat1, lon1, lat2, lon2) * 1000.0
}

/// Basic coordinate check: finite, in range, not an uninitialized (0, 0)-ish fix
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    if !lat.is_finite() || !lon.is_finite() {
        return false;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return false;
    }
    if lat == 0.0 && lon == 0.0 {
        return false;
    }
    !(lat.abs() < NEAR_ZERO_DEGREES && lon.abs() < NEAR_ZERO_DEGREES)
}

/// Altitude check for values that end up in the output
pub fn is_valid_altitude(alt: f64) -> bool {
    alt.is_finite() && (MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&alt)
}

/// Full fix predicate used by the known-schema extractor
pub fn is_valid_fix(lat: f64, lon: f64, alt: Option<f64>) -> bool {
    is_valid_coordinate(lat, lon) && alt.map_or(true, is_valid_altitude)
}

/// Opportunistic altitude read next to a discovered pair; bounds are exclusive
pub fn is_plausible_discovered_altitude(alt: f64) -> bool {
    alt.is_finite() && alt > MIN_ALTITUDE_M && alt < MAX_ALTITUDE_M
}
