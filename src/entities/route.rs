use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Place};

/// A place selected into a route, with the distance walked to reach it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(flatten)]
    pub place: Place,
    /// Miles from the previous stop, or from the start for the first stop.
    pub dist_from_last: f64,
}

impl Stop {
    pub fn new(place: Place, dist_from_last: f64) -> Self {
        Self {
            place,
            dist_from_last,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.place.coordinates
    }
}

/// Stops in visiting order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.stops.iter()
    }

    pub fn total_distance(&self) -> f64 {
        self.stops.iter().map(|stop| stop.dist_from_last).sum()
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Stop;
    type IntoIter = std::slice::Iter<'a, Stop>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}

#[test]
fn route_serializes_as_list_of_stops() {
    let route = Route::new(vec![Stop::new(
        Place::new("Bar", Coordinates::new(1.0, 2.0), None),
        0.5,
    )]);

    let value = serde_json::to_value(&route).unwrap();

    assert_eq!(
        value,
        serde_json::json!([
            { "name": "Bar", "lat": 1.0, "lng": 2.0, "rating": null, "dist_from_last": 0.5 }
        ])
    );
}

#[test]
fn route_total_distance() {
    let bar = Place::new("Bar", Coordinates::new(0.0, 0.0), None);
    let route = Route::new(vec![
        Stop::new(bar.clone(), 0.25),
        Stop::new(bar.clone(), 0.5),
        Stop::new(bar, 1.0),
    ]);

    assert_eq!(route.len(), 3);
    assert!((route.total_distance() - 1.75).abs() < 1e-12);
    assert_eq!(Route::default().total_distance(), 0.0);
}
