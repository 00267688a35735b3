//! Geographic primitives: validated coordinates, named points and the
//! planar distance used for ranking.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid coordinates ({latitude}, {longitude}): latitude must be -90..90 and longitude -180..180")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validate and build coordinates. Rejects NaN, infinities and
    /// out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Build without range checks. For compile-time constants only.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Default "whole world" view center.
    pub const fn origin() -> Self {
        Self { latitude: 0.0, longitude: 0.0 }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}\u{00B0} {}, {:.4}\u{00B0} {}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// A named, immutable point on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self { name, latitude, longitude }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new_unchecked(self.latitude, self.longitude)
    }
}

/// Euclidean distance computed directly on degree values.
///
/// This ignores Earth curvature and the shrinking of longitude degrees
/// away from the equator. It is only good enough to answer "which marker
/// is nearest on screen" at country scale; it is not a geodesic distance
/// and the result is in degrees, not kilometres.
pub fn planar_distance(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlon = a.longitude - b.longitude;
    (dlat * dlat + dlon * dlon).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coordinates_valid() {
        let c = Coordinates::new(28.7041, 77.1025).unwrap();
        assert_eq!(c.latitude, 28.7041);
        assert_eq!(c.longitude, 77.1025);
    }

    #[test]
    fn test_coordinates_bounds_inclusive() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
    }

    #[test]
    fn test_coordinates_reject_nan() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinates::new(-33.8688, 151.2093).unwrap();
        assert_eq!(c.to_string(), "33.8688\u{00B0} S, 151.2093\u{00B0} E");
    }

    #[test]
    fn test_distance_zero() {
        let a = Coordinates::new(19.076, 72.8777).unwrap();
        assert_eq!(planar_distance(a, a), 0.0);
    }

    #[test]
    fn test_distance_pythagorean() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(3.0, 4.0).unwrap();
        assert_relative_eq!(planar_distance(a, b), 5.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Coordinates::new(28.7041, 77.1025).unwrap();
        let b = Coordinates::new(12.9716, 77.5946).unwrap();
        assert_eq!(planar_distance(a, b), planar_distance(b, a));
    }
}
