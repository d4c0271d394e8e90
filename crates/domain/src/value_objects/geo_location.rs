//! Geographic location value object and great-circle distance

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for haversine distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic location with latitude and longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees
    latitude: f64,
    /// Longitude in degrees
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location without validation
    ///
    /// Live vehicle feeds report whatever the tracker sends, so positions are
    /// accepted as-is. Out-of-range or NaN values yield meaningless distances.
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a location from the string-typed coordinates used by stop lists
    ///
    /// Returns `None` if either component is not a number.
    #[must_use]
    pub fn from_strings(latitude: &str, longitude: &str) -> Option<Self> {
        let lat = latitude.trim().parse::<f64>().ok()?;
        let lon = longitude.trim().parse::<f64>().ok()?;
        Some(Self::new_unchecked(lat, lon))
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in kilometers
    ///
    /// Uses the haversine formula with a mean Earth radius of 6371 km.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Great-circle distance between two locations in kilometers
#[must_use]
pub fn haversine_km(from: &GeoLocation, to: &GeoLocation) -> f64 {
    from.distance_km(to)
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Reference locations
impl GeoLocation {
    /// Malé, Maldives
    #[must_use]
    pub const fn male() -> Self {
        Self::new_unchecked(4.1755, 73.5093)
    }

    /// Hulhumalé, Maldives
    #[must_use]
    pub const fn hulhumale() -> Self {
        Self::new_unchecked(4.2105, 73.5403)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let loc = GeoLocation::new(4.1755, 73.5093).expect("valid coordinates");
        assert!((loc.latitude() - 4.1755).abs() < f64::EPSILON);
        assert!((loc.longitude() - 73.5093).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
        assert!(GeoLocation::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(GeoLocation::new(0.0, 181.0).is_err());
        assert!(GeoLocation::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_unchecked_accepts_anything() {
        let loc = GeoLocation::new_unchecked(123.0, -500.0);
        assert!((loc.latitude() - 123.0).abs() < f64::EPSILON);
        assert!((loc.longitude() + 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_strings() {
        let loc = GeoLocation::from_strings("4.1755", " 73.5093 ").expect("parses");
        assert!((loc.latitude() - 4.1755).abs() < f64::EPSILON);
        assert!(GeoLocation::from_strings("", "73.5").is_none());
        assert!(GeoLocation::from_strings("4.17", "east").is_none());
    }

    #[test]
    fn test_display() {
        let loc = GeoLocation::male();
        let display = format!("{loc}");
        assert!(display.contains("4.175500"));
        assert!(display.contains("73.509300"));
    }

    #[test]
    fn test_distance_same_location() {
        let loc = GeoLocation::male();
        assert!(loc.distance_km(&loc).abs() < f64::EPSILON);
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let origin = GeoLocation::new_unchecked(0.0, 0.0);
        let east = GeoLocation::new_unchecked(0.0, 1.0);
        let distance = haversine_km(&origin, &east);
        assert!((distance - 111.19).abs() / 111.19 < 0.005);
    }

    #[test]
    fn test_distance_short_hop_in_male() {
        let anchor = GeoLocation::male();
        let bus = GeoLocation::new_unchecked(4.1755, 73.5094);
        let distance = anchor.distance_km(&bus);
        assert!((distance - 0.011).abs() < 0.001);
    }

    #[test]
    fn test_distance_male_hulhumale() {
        let distance = GeoLocation::male().distance_km(&GeoLocation::hulhumale());
        // Roughly 5 km across the lagoon
        assert!((distance - 5.2).abs() < 0.5);
    }

    #[test]
    fn test_nan_propagates() {
        let loc = GeoLocation::new_unchecked(f64::NAN, 0.0);
        assert!(loc.distance_km(&GeoLocation::male()).is_nan());
    }

    #[test]
    fn test_serialization() {
        let loc = GeoLocation::male();
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(json.contains("4.1755"));
        assert!(json.contains("73.5093"));

        let deserialized: GeoLocation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, deserialized);
    }
}
