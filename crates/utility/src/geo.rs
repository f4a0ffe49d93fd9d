pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Highest zoom level served by common slippy map tile servers.
pub const MAX_ZOOM: u8 = 19;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Whether the pair denotes a point on the globe. NaN and infinities are
/// rejected as well as anything outside the WGS84 ranges.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Returns the `(x, y)` index of the web mercator tile containing the given
/// coordinate at `zoom`.
pub fn tile_for(latitude: f64, longitude: f64, zoom: u8) -> (u32, u32) {
    let tiles = f64::from(1u32 << zoom.min(MAX_ZOOM));
    let max_index = tiles - 1.0;
    let lat_rad = to_radians(latitude);

    let x = ((longitude + 180.0) / 360.0 * tiles).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI)
        / 2.0
        * tiles)
        .floor();

    (x.clamp(0.0, max_index) as u32, y.clamp(0.0, max_index) as u32)
}
