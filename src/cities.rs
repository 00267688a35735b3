//! The fixed city dataset plotted on the map.

use crate::geo::GeoPoint;
use serde::Serialize;

pub static CITIES: [GeoPoint; 10] = [
    GeoPoint::new("Delhi", 28.7041, 77.1025),
    GeoPoint::new("Mumbai", 19.0760, 72.8777),
    GeoPoint::new("Bangalore", 12.9716, 77.5946),
    GeoPoint::new("Kolkata", 22.5726, 88.3639),
    GeoPoint::new("Chennai", 13.0827, 80.2707),
    GeoPoint::new("Hyderabad", 17.3850, 78.4867),
    GeoPoint::new("Ahmedabad", 23.0225, 72.5714),
    GeoPoint::new("Pune", 18.5204, 73.8567),
    GeoPoint::new("Jaipur", 26.9124, 75.7873),
    GeoPoint::new("Lucknow", 26.8467, 80.9462),
];

/// A city entry for the public city list API.
#[derive(Debug, Clone, Serialize)]
pub struct CityInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Return the full city list (for the API and `sosmap markers`).
pub fn city_list() -> Vec<CityInfo> {
    CITIES
        .iter()
        .map(|c| CityInfo {
            name: c.name.to_string(),
            lat: c.latitude,
            lon: c.longitude,
        })
        .collect()
}

/// Case-insensitive lookup by name.
pub fn find_city(name: &str) -> Option<&'static GeoPoint> {
    let q = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(q))
}
