use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the Earth's surface in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.to_string()
    }
}

#[test]
fn coordinates_format_as_lat_lng() {
    let location: String = Coordinates::new(40.7128, -74.006).into();
    assert_eq!(location, "40.7128,-74.006");
}

#[test]
fn coordinates_validity() {
    assert!(Coordinates::new(90.0, -180.0).is_valid());
    assert!(!Coordinates::new(90.5, 0.0).is_valid());
    assert!(!Coordinates::new(0.0, 181.0).is_valid());
    assert!(!Coordinates::new(f64::NAN, 0.0).is_finite());
    assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
}
