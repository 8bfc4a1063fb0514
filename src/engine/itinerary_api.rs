use super::Engine;

use async_trait::async_trait;

use crate::{
    api::ItineraryAPI,
    entities::Itinerary,
    error::{invalid_input_error, no_candidates_error, Error},
    planner,
};

#[async_trait]
impl ItineraryAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_itinerary(
        &self,
        address: String,
        stops: Option<i64>,
    ) -> Result<Itinerary, Error> {
        let address = address.trim().to_string();
        if address.is_empty() {
            return Err(invalid_input_error());
        }

        let stops = stops.unwrap_or(self.planner.default_stops);

        let start = self.resolver.resolve(&address).await?;

        let candidates = self
            .finder
            .find_nearby(start, self.planner.search_radius_miles)
            .await?;

        if candidates.is_empty() {
            tracing::warn!("no candidates near {}", start);
            return Err(no_candidates_error());
        }

        let route = planner::plan(start, &candidates, stops)?;

        tracing::info!(
            "planned {} of {} candidates, {:.2} miles",
            route.len(),
            candidates.len(),
            route.total_distance()
        );

        Ok(Itinerary::new(
            address,
            start,
            route,
            &self.planner.map_base_url,
        ))
    }
}

#[tokio::test]
async fn plans_from_resolved_address() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    );

    let itinerary = api
        .create_itinerary("  Null Island  ".into(), Some(2))
        .await
        .unwrap();

    let names: Vec<&str> = itinerary
        .route
        .iter()
        .map(|stop| stop.place.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "C"]);
    assert_eq!(itinerary.address, "Null Island");
    assert_eq!(
        itinerary.map_url,
        "https://www.google.com/maps/dir/0,0/1,0/2,0"
    );
}

#[tokio::test]
async fn default_stop_count_applies() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};

    let finder = StubFinder::with_places(equator_bars());
    let api = engine(StubResolver::at(Coordinates::new(0.0, 0.0)), finder.clone());

    let itinerary = api.create_itinerary("origin".into(), None).await.unwrap();
    assert_eq!(itinerary.route.len(), 3);

    let radius = finder.last_radius().unwrap();
    assert!((radius - crate::config::PlannerConfig::default().search_radius_miles).abs() < 1e-12);
}

#[tokio::test]
async fn empty_search_is_no_candidates() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use crate::test_support::{engine, StubFinder, StubResolver};

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(vec![]),
    );

    let err = api
        .create_itinerary("middle of nowhere".into(), Some(3))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoCandidatesFound);
}

#[tokio::test]
async fn resolution_failures_propagate() {
    use crate::error::{resolution_error, ErrorKind};
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};

    let finder = StubFinder::with_places(equator_bars());
    let api = engine(
        StubResolver::failing(resolution_error("ZERO_RESULTS")),
        finder.clone(),
    );

    let err = api
        .create_itinerary("asdfghjkl".into(), Some(3))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(finder.last_radius().is_none());
}

#[test]
fn blank_address_is_invalid_input() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};
    use tokio_test::block_on;

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    );

    let err = block_on(api.create_itinerary("   ".into(), Some(3))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
