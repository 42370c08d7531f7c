/// Web Mercator projection onto the zoom-0 world plane.
///
/// World coordinates are pixels of the 256px square world at zoom 0; a
/// slippy-map zoom level `z` is a uniform scale of `2^z` on top of this.

/// Pixel size of the square world at zoom 0.
pub const WORLD_SIZE: f64 = 256.0;

/// Latitude clamp of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Project longitude/latitude (decimal degrees) to zoom-0 world pixels.
/// Latitudes beyond the projection limit clamp to the world edge.
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = (lon + 180.0) / 360.0 * WORLD_SIZE;
    let sin = lat.to_radians().sin();
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * std::f64::consts::PI)) * WORLD_SIZE;
    (x, y)
}
