//! Spherical Web Mercator (EPSG:3857).
//!
//! Latitudes beyond ±85.0511° map outside the square world extent, so forward
//! projection clamps northing to the extent edge.

use cog_common::crs::WEB_MERCATOR_MAX_EXTENT;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Sphere radius used by EPSG:3857 (WGS84 semi-major axis), in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the Web Mercator square ends, in degrees.
pub const MAX_LATITUDE: f64 = 85.0511287798066;

/// Project lon/lat degrees to Web Mercator meters.
pub fn lonlat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lon.to_radians();
    let lat = lat.clamp(-90.0, 90.0);
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();

    (x, y.clamp(-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT))
}

/// Unproject Web Mercator meters to lon/lat degrees.
pub fn mercator_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = lonlat_to_mercator(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_is_world_edge() {
        let (x, _) = lonlat_to_mercator(180.0, 0.0);
        assert!((x - WEB_MERCATOR_MAX_EXTENT).abs() < 1e-6);
    }

    #[test]
    fn test_max_latitude_is_world_edge() {
        let (_, y) = lonlat_to_mercator(0.0, MAX_LATITUDE);
        assert!((y - WEB_MERCATOR_MAX_EXTENT).abs() < 1e-3);
    }

    #[test]
    fn test_poles_are_clamped() {
        let (_, north) = lonlat_to_mercator(0.0, 90.0);
        let (_, south) = lonlat_to_mercator(0.0, -90.0);
        assert_eq!(north, WEB_MERCATOR_MAX_EXTENT);
        assert_eq!(south, -WEB_MERCATOR_MAX_EXTENT);
    }

    #[test]
    fn test_known_point() {
        // Paris
        let (x, y) = lonlat_to_mercator(2.3522, 48.8566);
        assert!((x - 261845.7).abs() < 1.0);
        assert!((y - 6250564.3).abs() < 1.0);

        let (lon, lat) = mercator_to_lonlat(x, y);
        assert!((lon - 2.3522).abs() < 1e-9);
        assert!((lat - 48.8566).abs() < 1e-9);
    }
}
