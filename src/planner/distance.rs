use crate::entities::Coordinates;

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

pub const METERS_PER_MILE: f64 = 1609.344;

/// Haversine great-circle distance in miles.
///
/// Symmetric and zero for identical points. Always finite for coordinates
/// within [-90, 90] x [-180, 180]; the result for NaN or out-of-range
/// coordinates is unspecified.
pub fn distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let phi1 = p1.lat.to_radians();
    let phi2 = p2.lat.to_radians();
    let delta_phi = (p2.lat - p1.lat).to_radians();
    let delta_lambda = (p2.lng - p1.lng).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points.
    let a = ((delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);

    EARTH_RADIUS_MILES * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[test]
fn distance_is_symmetric() {
    let points = [
        Coordinates::new(40.7128, -74.0060),
        Coordinates::new(34.0522, -118.2437),
        Coordinates::new(-33.8688, 151.2093),
        Coordinates::new(51.5074, -0.1278),
        Coordinates::new(89.9, 179.9),
        Coordinates::new(-89.9, -179.9),
        Coordinates::new(0.0, 0.0),
    ];

    for p in points {
        for q in points {
            assert!((distance(p, q) - distance(q, p)).abs() < 1e-9);
        }
    }
}

#[test]
fn distance_to_self_is_zero() {
    for p in [
        Coordinates::new(0.0, 0.0),
        Coordinates::new(40.7128, -74.0060),
        Coordinates::new(-90.0, 180.0),
    ] {
        assert_eq!(distance(p, p), 0.0);
    }
}

#[test]
fn new_york_to_los_angeles() {
    let new_york = Coordinates::new(40.7128, -74.0060);
    let los_angeles = Coordinates::new(34.0522, -118.2437);

    let miles = distance(new_york, los_angeles);
    assert!((miles - 2445.0).abs() <= 5.0, "got {}", miles);
}

#[test]
fn one_degree_along_the_equator() {
    let miles = distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
    let expected = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;
    assert!((miles - expected).abs() < 1e-9);
}

#[test]
fn antipodal_points_are_half_the_circumference() {
    let half = EARTH_RADIUS_MILES * std::f64::consts::PI;

    let miles = distance(Coordinates::new(-29.877, -125.99), Coordinates::new(29.877, 54.01));
    assert!(miles.is_finite());
    assert!((miles - half).abs() < 1.0, "got {}", miles);

    let miles = distance(Coordinates::new(90.0, 0.0), Coordinates::new(-90.0, 0.0));
    assert!((miles - half).abs() < 1e-6, "got {}", miles);

    let miles = distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
    assert!((miles - half).abs() < 1e-6, "got {}", miles);
}

#[test]
fn antipodes_of_a_grid_stay_finite() {
    let half = EARTH_RADIUS_MILES * std::f64::consts::PI;

    for lat in -90..=90 {
        for lng in (-180..=180).step_by(3) {
            let lat = lat as f64 + 0.123;
            let lat = lat.min(90.0);
            let lng = lng as f64;
            let opposite_lng = if lng > 0.0 { lng - 180.0 } else { lng + 180.0 };

            let miles = distance(Coordinates::new(lat, lng), Coordinates::new(-lat, opposite_lng));
            assert!(miles.is_finite(), "NaN at {},{}", lat, lng);
            assert!(miles <= half + 1e-9);
        }
    }
}

#[test]
fn dateline_crossing_takes_the_short_way() {
    let miles = distance(Coordinates::new(0.0, 179.9), Coordinates::new(0.0, -179.9));
    let expected = 0.2 * EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;
    assert!((miles - expected).abs() < 1e-6, "got {}", miles);
    assert!((miles - 13.82).abs() < 0.01);
}

#[test]
fn points_at_a_pole_coincide() {
    let miles = distance(Coordinates::new(90.0, 0.0), Coordinates::new(90.0, 120.0));
    assert!(miles < 1e-9, "got {}", miles);
}
