//! Route planning over great-circle distance.
//!
//! [`plan`] is the entry point used by the engine. It checks its input and
//! hands off to [`build_route`], which runs a greedy nearest-neighbor walk
//! from the start point. The walk is myopic: it never looks ahead and does
//! not minimise total walking distance.

pub mod distance;
pub mod route_builder;

pub use distance::{distance, EARTH_RADIUS_MILES, METERS_PER_MILE};
pub use route_builder::build_route;

use crate::entities::{Coordinates, Place, Route};
use crate::error::{invalid_input_error, Error};

/// Plans a route of at most `max_stops` stops.
///
/// A negative `max_stops` is treated as zero. A non-finite start or
/// candidate coordinate is rejected before any stop is chosen.
pub fn plan(start: Coordinates, candidates: &[Place], max_stops: i64) -> Result<Route, Error> {
    if !start.is_finite() {
        tracing::warn!("rejecting non-finite start {:?}", start);
        return Err(invalid_input_error());
    }

    if let Some(place) = candidates.iter().find(|place| !place.coordinates.is_finite()) {
        tracing::warn!("rejecting candidate {:?} with non-finite coordinates", place.name);
        return Err(invalid_input_error());
    }

    let max_stops = usize::try_from(max_stops).unwrap_or(0);

    Ok(build_route(start, candidates, max_stops))
}

#[test]
fn negative_stop_count_plans_nothing() {
    let candidates = vec![Place::new("A", Coordinates::new(1.0, 0.0), None)];

    let route = plan(Coordinates::new(0.0, 0.0), &candidates, -3).unwrap();
    assert!(route.is_empty());

    let route = plan(Coordinates::new(0.0, 0.0), &candidates, 0).unwrap();
    assert!(route.is_empty());
}

#[test]
fn non_finite_coordinates_are_invalid_input() {
    use crate::error::ErrorKind;

    let candidates = vec![
        Place::new("A", Coordinates::new(1.0, 0.0), None),
        Place::new("Broken", Coordinates::new(f64::NAN, 0.0), None),
    ];

    let err = plan(Coordinates::new(0.0, 0.0), &candidates, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = plan(Coordinates::new(f64::INFINITY, 0.0), &candidates[..1], 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn stop_count_above_candidates_visits_all() {
    let candidates = vec![
        Place::new("A", Coordinates::new(1.0, 0.0), Some(4.0)),
        Place::new("B", Coordinates::new(5.0, 0.0), None),
        Place::new("C", Coordinates::new(2.0, 0.0), Some(3.5)),
    ];

    let route = plan(Coordinates::new(0.0, 0.0), &candidates, 10).unwrap();

    let names: Vec<&str> = route.iter().map(|stop| stop.place.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "B"]);
}
