//! Geography
//!
//! Great-circle distances and the fixed proximity threshold used to auto-complete
//! key points while a tour is being walked.

use thiserror::Error;

/// Mean Earth radius in metres, treating the Earth as a sphere.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A tourist is "near" a key point at or below this distance.
pub const PROXIMITY_THRESHOLD_METERS: f64 = 50.0;

/// Errors raised when validating coordinates.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate.
    ///
    /// # Errors
    ///
    /// Returns a [`GeoError`] if either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other`, in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Great-circle distance in metres between two points, via the haversine formula.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Whether a distance qualifies as "near".
pub fn is_within_threshold(distance_meters: f64) -> bool {
    distance_meters <= PROXIMITY_THRESHOLD_METERS
}
