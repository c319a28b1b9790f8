// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Radius of Earth used by the haversine formula, in kilometers.
pub const EARTH_RADIUS: f64 = 6371.0;

/// Mean diameter of Earth, in kilometers.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// A latitude-longitude pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point, in kilometers.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        earth_distance(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in kilometers.
///
/// The function is symmetric and returns zero for coincident positions.
/// NaN inputs produce a NaN result.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding may push h slightly above 1 for antipodal points
    EARTH_DIAMETER * h.sqrt().clamp(0.0, 1.0).asin()
}

/// Returns the arithmetic mean of latitudes and longitudes of the provided points,
/// or `None` if there are no points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
    let n = points.len() as f64;

    Some(Point {
        lat: lat_sum / n,
        lon: lon_sum / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-4),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (44.8883184, -0.5799906, 43.7195563, -0.269957),
            (48.8566, 2.3522, 44.0, -0.5),
            (-33.9, 18.4, 51.5, -0.1),
            (0.0, 179.9, 0.0, -179.9),
        ];

        for (lat1, lon1, lat2, lon2) in pairs {
            assert_eq!(
                earth_distance(lat1, lon1, lat2, lon2),
                earth_distance(lat2, lon2, lat1, lon1)
            );
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(earth_distance(44.0, -0.5, 44.0, -0.5), 0.0);
        assert_eq!(earth_distance(-89.9, 120.0, -89.9, 120.0), 0.0);
    }

    #[test]
    fn distance_known_values() {
        // One degree of latitude along a meridian
        assert_almost_eq!(earth_distance(0.0, 0.0, 1.0, 0.0), 111.19493);
        // Paris - Bordeaux
        assert!((earth_distance(48.8566, 2.3522, 44.8378, -0.5792) - 499.0).abs() < 2.0);
    }

    #[test]
    fn distance_propagates_nan() {
        assert!(earth_distance(f64::NAN, 0.0, 1.0, 1.0).is_nan());
        assert!(earth_distance(0.0, 0.0, 1.0, f64::NAN).is_nan());
    }

    #[test]
    fn distance_antipodal() {
        assert_almost_eq!(
            earth_distance(0.0, 0.0, 0.0, 180.0),
            EARTH_RADIUS * std::f64::consts::PI
        );
    }

    #[test]
    fn centroid_of_two_points() {
        let c = centroid(&[Point::new(0.0, 0.0), Point::new(0.0, 2.0)]).unwrap();
        assert_eq!(c, Point::new(0.0, 1.0));
    }

    #[test]
    fn centroid_of_single_point() {
        let p = Point::new(44.8883184, -0.5799906);
        assert_eq!(centroid(&[p]), Some(p));
    }

    #[test]
    fn centroid_of_nothing() {
        assert_eq!(centroid(&[]), None);
    }
}
