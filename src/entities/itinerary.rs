use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Route};

/// A planned route together with the request it answers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Itinerary {
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    pub address: String,
    pub start: Coordinates,
    pub route: Route,
    pub total_distance: f64,
    pub map_url: String,
}

impl Itinerary {
    pub fn new(address: String, start: Coordinates, route: Route, map_base_url: &str) -> Self {
        let map_url = map_url(map_base_url, start, &route);

        Self {
            token: Uuid::new_v4(),
            created_at: Utc::now(),
            address,
            start,
            total_distance: route.total_distance(),
            route,
            map_url,
        }
    }
}

/// Directions link of the form `<base>/<start>/<stop1>/.../<stopN>`.
pub fn map_url(base: &str, start: Coordinates, route: &Route) -> String {
    let mut url = base.trim_end_matches('/').to_string();

    url.push('/');
    url.push_str(&start.to_string());

    for stop in route {
        url.push('/');
        url.push_str(&stop.coordinates().to_string());
    }

    url
}

#[test]
fn map_url_lists_start_then_stops() {
    use crate::entities::{Place, Stop};

    let route = Route::new(vec![
        Stop::new(Place::new("A", Coordinates::new(1.5, 2.0), None), 1.0),
        Stop::new(Place::new("B", Coordinates::new(-3.25, 4.0), None), 1.0),
    ]);

    assert_eq!(
        map_url("https://www.google.com/maps/dir/", Coordinates::new(0.0, 0.5), &route),
        "https://www.google.com/maps/dir/0,0.5/1.5,2/-3.25,4"
    );
}

#[test]
fn map_url_for_empty_route_is_start_only() {
    assert_eq!(
        map_url("https://www.google.com/maps/dir", Coordinates::new(10.0, 20.0), &Route::default()),
        "https://www.google.com/maps/dir/10,20"
    );
}

#[test]
fn itinerary_totals_route() {
    use crate::entities::{Place, Stop};

    let route = Route::new(vec![
        Stop::new(Place::new("A", Coordinates::new(1.0, 0.0), None), 0.5),
        Stop::new(Place::new("B", Coordinates::new(2.0, 0.0), None), 0.75),
    ]);

    let itinerary = Itinerary::new("1 Main St".into(), Coordinates::new(0.0, 0.0), route, "https://maps");

    assert!((itinerary.total_distance - 1.25).abs() < 1e-12);
    assert_eq!(itinerary.map_url, "https://maps/0,0/1,0/2,0");
    assert_eq!(itinerary.route.len(), 2);
}
