//! Spherical pseudo-mercator reprojection.
//!
//! The planar CRS used throughout the workspace is the web-mercator
//! meter grid. Both directions are closed-form, so round-tripping is
//! exact up to floating point.

use crate::C;
use geo::geometry::Coord;
use std::f64::consts::FRAC_PI_2;

/// WGS84 semi-major axis in meters.
const EARTH_RADIUS_M: C = 6_378_137.0;

/// Latitudes beyond this fold onto the projection's square edge.
const MAX_LAT_DEG: C = 85.051_128_78;

/// Projects geodetic degrees (lon, lat) to planar meters.
pub fn to_planar(geodetic: Coord<C>) -> Coord<C> {
    let lat = geodetic.y.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
    Coord {
        x: EARTH_RADIUS_M * geodetic.x.to_radians(),
        y: EARTH_RADIUS_M * (0.5 * (FRAC_PI_2 + lat)).tan().ln(),
    }
}

/// Inverse of [`to_planar`], planar meters back to degrees.
pub fn to_geodetic(planar: Coord<C>) -> Coord<C> {
    Coord {
        x: (planar.x / EARTH_RADIUS_M).to_degrees(),
        y: (2.0 * (planar.y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::{to_geodetic, to_planar};
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    #[test]
    fn test_known_point() {
        // Cheshire-ish, cross-checked against proj's EPSG:3857 output.
        let planar = to_planar(Coord {
            x: -2.666_386_831_95,
            y: 53.132_707_107_58,
        });
        assert_relative_eq!(planar.x, -296_821.2, epsilon = 2.0);
        assert_relative_eq!(planar.y, 7_007_582.0, epsilon = 25.0);
    }

    #[test]
    fn test_round_trip_sub_meter() {
        let original = Coord {
            x: -71.303_25,
            y: 44.270_5,
        };
        let there = to_planar(original);
        let back = to_geodetic(there);
        let planar_again = to_planar(back);
        // Sub-meter in planar space, degree-exact to 1e-9.
        assert_relative_eq!(planar_again.x, there.x, epsilon = 1e-3);
        assert_relative_eq!(planar_again.y, there.y, epsilon = 1e-3);
        assert_relative_eq!(back.x, original.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, original.y, epsilon = 1e-9);
    }

    #[test]
    fn test_equator_is_origin() {
        let planar = to_planar(Coord { x: 0.0, y: 0.0 });
        assert_relative_eq!(planar.x, 0.0);
        assert_relative_eq!(planar.y, 0.0);
    }
}
