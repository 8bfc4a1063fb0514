use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::{DynAPI, ItineraryAPI};
use crate::entities::Itinerary;
use crate::error::{invalid_input_error, Error};

#[derive(Deserialize)]
pub struct GenerateParams {
    address: String,
    stops: Option<i64>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    status: String,
    #[serde(flatten)]
    itinerary: Itinerary,
}

pub async fn generate(
    Extension(api): Extension<DynAPI>,
    params: Result<Query<GenerateParams>, QueryRejection>,
) -> Result<Json<GenerateResponse>, Error> {
    let Query(params) = params.map_err(|rejection| {
        tracing::warn!("rejected query: {}", rejection);
        invalid_input_error()
    })?;

    let itinerary = api.create_itinerary(params.address, params.stops).await?;

    Ok(GenerateResponse {
        status: "success".into(),
        itinerary,
    }
    .into())
}

#[cfg(test)]
async fn get_route(api: DynAPI, query: &str) -> reqwest::Response {
    let app = crate::server::router(api, &[]).unwrap();
    let addr = crate::test_support::spawn(app);

    reqwest::get(format!("http://{}/generate-route?{}", addr, query))
        .await
        .unwrap()
}

#[tokio::test]
async fn generates_route_with_default_stops() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, StubFinder, StubResolver};
    use std::sync::Arc;

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(crate::test_support::equator_bars()),
    )) as DynAPI;

    let res = get_route(api, "address=Null%20Island").await;
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["address"], "Null Island");
    assert_eq!(body["route"].as_array().unwrap().len(), 3);
    assert_eq!(body["route"][0]["name"], "A");
    assert_eq!(body["route"][0]["rating"], 4.2);
    assert_eq!(body["route"][2]["name"], "B");
    assert_eq!(body["route"][2]["rating"], serde_json::Value::Null);
    assert!(body["route"][1]["dist_from_last"].as_f64().unwrap() > 69.0);
    assert_eq!(body["map_url"], "https://www.google.com/maps/dir/0,0/1,0/2,0/5,0");
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn honours_requested_stops() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};
    use std::sync::Arc;

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    )) as DynAPI;

    let body: serde_json::Value = get_route(api.clone(), "address=x&stops=1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["route"].as_array().unwrap().len(), 1);

    let body: serde_json::Value = get_route(api, "address=x&stops=-2")
        .await
        .json()
        .await
        .unwrap();
    assert!(body["route"].as_array().unwrap().is_empty());
    assert_eq!(body["total_distance"], 0.0);
}

#[tokio::test]
async fn failures_map_to_distinct_statuses() {
    use crate::entities::Coordinates;
    use crate::error::{resolution_error, upstream_error};
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};
    use std::sync::Arc;

    let no_bars = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(vec![]),
    )) as DynAPI;
    let res = get_route(no_bars, "address=desert").await;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "no_candidates_found");

    let bad_address = Arc::new(engine(
        StubResolver::failing(resolution_error("ZERO_RESULTS")),
        StubFinder::with_places(equator_bars()),
    )) as DynAPI;
    let res = get_route(bad_address, "address=qwerty").await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "resolution");
    assert_eq!(body["code"], 102);

    let upstream_down = Arc::new(engine(
        StubResolver::failing(upstream_error()),
        StubFinder::with_places(equator_bars()),
    )) as DynAPI;
    let res = get_route(upstream_down, "address=anywhere").await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Gateway");
}

#[tokio::test]
async fn malformed_query_is_invalid_input() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};
    use std::sync::Arc;

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    )) as DynAPI;

    for query in ["stops=2", "address=x&stops=abc", "address=x&stops=2.5"] {
        let res = get_route(api.clone(), query).await;
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST, "{}", query);

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["kind"], "invalid_input");
        assert_eq!(body["code"], 101);
    }

    let res = get_route(api, "address=%20%20").await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}
