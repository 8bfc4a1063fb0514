use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// A candidate point of interest returned by a place search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub rating: Option<f64>,
}

impl Place {
    pub fn new(name: impl Into<String>, coordinates: Coordinates, rating: Option<f64>) -> Self {
        Self {
            name: name.into(),
            coordinates,
            rating,
        }
    }

    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => rating.to_string(),
            None => "N/A".into(),
        }
    }
}

#[test]
fn place_serializes_flat() {
    let place = Place::new("The Dead Rabbit", Coordinates::new(40.7032, -74.0111), Some(4.6));
    let value = serde_json::to_value(&place).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "name": "The Dead Rabbit",
            "lat": 40.7032,
            "lng": -74.0111,
            "rating": 4.6,
        })
    );
}

#[test]
fn unrated_place_label() {
    let place = Place::new("Dive", Coordinates::new(0.0, 0.0), None);
    assert_eq!(place.rating_label(), "N/A");
    assert_eq!(serde_json::to_value(&place).unwrap()["rating"], serde_json::Value::Null);
}
