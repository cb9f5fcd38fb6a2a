//! Coordinate conversion and great-circle distance

/// Mean Earth radius used for distance accumulation
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Convert an NMEA `ddmm.mmmm` (or `dddmm.mmmm`) coordinate into decimal
/// degrees. Southern and western hemispheres come out negative.
pub fn dm_to_decimal_degrees(degrees_minutes: f64, direction: char) -> f64 {
    let degrees = (degrees_minutes / 100.0).trunc();
    let minutes = degrees_minutes - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;
    if direction == 'S' || direction == 'W' {
        -decimal
    } else {
        decimal
    }
}

/// Haversine distance in kilometers between two decimal-degree points.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
