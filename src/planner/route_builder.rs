use crate::entities::{Coordinates, Place, Route, Stop};
use crate::planner::distance;

/// Orders up to `max_stops` candidates by repeatedly walking to the nearest
/// one not yet visited.
///
/// Ties go to the candidate that comes first in `candidates`. The input is
/// only borrowed; stops are built from clones.
pub fn build_route(start: Coordinates, candidates: &[Place], max_stops: usize) -> Route {
    let mut pool: Vec<&Place> = candidates.iter().collect();
    let mut stops = Vec::with_capacity(max_stops.min(pool.len()));
    let mut current = start;

    while !pool.is_empty() && stops.len() < max_stops {
        let Some((index, dist_from_last)) = nearest(current, &pool) else {
            break;
        };

        let place = pool.remove(index);
        tracing::debug!(
            "stop {}: {} at {:.3} miles",
            stops.len() + 1,
            place.name,
            dist_from_last
        );

        current = place.coordinates;
        stops.push(Stop::new(place.clone(), dist_from_last));
    }

    Route::new(stops)
}

fn nearest(from: Coordinates, pool: &[&Place]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, place) in pool.iter().enumerate() {
        let d = distance(from, place.coordinates);
        match best {
            Some((_, best_distance)) if d >= best_distance => {}
            _ => best = Some((index, d)),
        }
    }

    best
}

#[cfg(test)]
fn bar(name: &str, lat: f64, lng: f64) -> Place {
    Place::new(name, Coordinates::new(lat, lng), None)
}

#[cfg(test)]
fn scattered_bars() -> Vec<Place> {
    vec![
        bar("Ace", 40.7306, -73.9866),
        bar("Brass Monkey", 40.7420, -74.0080),
        bar("Cellar", 40.7195, -73.9973),
        bar("Dublin House", 40.7810, -73.9790),
        bar("Elsewhere", 40.7062, -73.9237),
        bar("Fanelli", 40.7247, -73.9985),
        bar("Grand Army", 40.6867, -73.9860),
    ]
}

#[test]
fn route_length_is_min_of_stops_and_candidates() {
    let start = Coordinates::new(40.7128, -74.0060);
    let candidates = scattered_bars();

    for max_stops in 0..12 {
        let route = build_route(start, &candidates, max_stops);
        assert_eq!(route.len(), max_stops.min(candidates.len()));
    }

    assert!(build_route(start, &[], 5).is_empty());
}

#[test]
fn route_never_repeats_a_place() {
    let start = Coordinates::new(40.7128, -74.0060);
    let candidates = scattered_bars();
    let route = build_route(start, &candidates, candidates.len());

    let mut names: Vec<&str> = route.iter().map(|stop| stop.place.name.as_str()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), candidates.len());
}

#[test]
fn each_stop_is_nearest_remaining_candidate() {
    let start = Coordinates::new(40.7128, -74.0060);
    let candidates = scattered_bars();
    let route = build_route(start, &candidates, candidates.len());

    let mut remaining = candidates.clone();
    let mut previous = start;

    for stop in &route {
        let closest = remaining
            .iter()
            .map(|place| distance(previous, place.coordinates))
            .fold(f64::INFINITY, f64::min);

        assert_eq!(stop.dist_from_last, closest);
        assert_eq!(stop.dist_from_last, distance(previous, stop.coordinates()));

        let index = remaining.iter().position(|place| *place == stop.place).unwrap();
        remaining.remove(index);
        previous = stop.coordinates();
    }
}

#[test]
fn route_is_deterministic() {
    let start = Coordinates::new(40.7128, -74.0060);
    let candidates = scattered_bars();

    assert_eq!(
        build_route(start, &candidates, 4),
        build_route(start, &candidates, 4)
    );
}

#[test]
fn greedy_walk_along_the_equator() {
    let start = Coordinates::new(0.0, 0.0);
    let candidates = vec![bar("A", 1.0, 0.0), bar("B", 5.0, 0.0), bar("C", 2.0, 0.0)];

    let route = build_route(start, &candidates, 2);
    let one_degree = distance(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));

    let names: Vec<&str> = route.iter().map(|stop| stop.place.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert!((route.stops()[0].dist_from_last - one_degree).abs() < 1e-9);
    assert!((route.stops()[1].dist_from_last - one_degree).abs() < 1e-9);
}

#[test]
fn ties_go_to_first_candidate() {
    let start = Coordinates::new(0.0, 0.0);
    let candidates = vec![bar("North", 1.0, 0.0), bar("South", -1.0, 0.0)];

    let route = build_route(start, &candidates, 1);
    assert_eq!(route.stops()[0].place.name, "North");

    let reversed: Vec<Place> = candidates.into_iter().rev().collect();
    let route = build_route(start, &reversed, 1);
    assert_eq!(route.stops()[0].place.name, "South");
}

#[test]
fn candidates_are_left_untouched() {
    let start = Coordinates::new(40.7128, -74.0060);
    let candidates = scattered_bars();
    let before = candidates.clone();

    build_route(start, &candidates, 3);

    assert_eq!(candidates, before);
}

#[test]
fn far_side_of_the_globe_is_not_mistaken_for_nearest() {
    let start = Coordinates::new(-29.877, -125.99);
    let candidates = vec![bar("Antipode", 29.877, 54.01), bar("Local", -29.87, -125.98)];

    let route = build_route(start, &candidates, 2);

    let names: Vec<&str> = route.iter().map(|stop| stop.place.name.as_str()).collect();
    assert_eq!(names, vec!["Local", "Antipode"]);
    assert!(route.iter().all(|stop| stop.dist_from_last.is_finite()));
}
