use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    api::{AddressResolver, PlaceFinder},
    config::GoogleMapsConfig,
    entities::{Coordinates, Place},
    error::{resolution_error, upstream_error, Error},
    planner::METERS_PER_MILE,
};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Statuses that describe the service or the key, not the address.
const SERVICE_FAILURE_STATUSES: [&str; 4] = [
    "REQUEST_DENIED",
    "OVER_QUERY_LIMIT",
    "OVER_DAILY_LIMIT",
    "UNKNOWN_ERROR",
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NearbyResult {
    #[serde(default)]
    pub name: String,
    pub geometry: Geometry,
    pub rating: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<Vec<T>>,
    error_message: Option<String>,
}

/// Client for the Google Maps geocoding and nearby-search endpoints.
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    place_type: String,
}

impl GoogleMaps {
    pub fn new(config: &GoogleMapsConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            place_type: config.place_type.clone(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response<T>, Error> {
        let url = format!("{}{}", self.api_base, path);

        let res = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status_code = res.status();

        if !status_code.is_success() {
            tracing::warn!("{} answered with http status {}", path, status_code);
            return Err(upstream_error());
        }

        let data: Response<T> = res.json().await?;

        if let Some(message) = &data.error_message {
            tracing::warn!("{} reported {}: {}", path, data.status, message);
        }

        Ok(data)
    }
}

#[async_trait]
impl AddressResolver for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, address: &str) -> Result<Coordinates, Error> {
        let data: Response<GeocodeResult> = self
            .fetch(GEOCODE_PATH, &[("address", address.to_string())])
            .await?;

        match data.status.as_str() {
            "OK" => {
                let result = data
                    .results
                    .and_then(|results| results.into_iter().next())
                    .ok_or_else(|| resolution_error("ZERO_RESULTS"))?;

                if !result.geometry.location.is_valid() {
                    tracing::warn!("geocoder returned out-of-range {}", result.geometry.location);
                    return Err(upstream_error());
                }

                tracing::info!(
                    "resolved to {:?} at {}",
                    result.formatted_address,
                    result.geometry.location
                );

                Ok(result.geometry.location)
            }
            status if SERVICE_FAILURE_STATUSES.contains(&status) => Err(upstream_error()),
            status => Err(resolution_error(status)),
        }
    }
}

#[async_trait]
impl PlaceFinder for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn find_nearby(
        &self,
        center: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<Place>, Error> {
        let radius_meters = (radius_miles * METERS_PER_MILE).round();

        let data: Response<NearbyResult> = self
            .fetch(
                NEARBY_SEARCH_PATH,
                &[
                    ("location", center.into()),
                    ("radius", radius_meters.to_string()),
                    ("type", self.place_type.clone()),
                ],
            )
            .await?;

        if !(data.status == "OK" || data.status == "ZERO_RESULTS") {
            return Err(upstream_error());
        }

        let places: Vec<Place> = data
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|result| {
                if result.name.trim().is_empty() {
                    tracing::warn!("dropping unnamed result at {}", result.geometry.location);
                    return None;
                }
                if !result.geometry.location.is_valid() {
                    tracing::warn!("dropping {} at out-of-range {}", result.name, result.geometry.location);
                    return None;
                }

                Some(Place::new(result.name, result.geometry.location, result.rating))
            })
            .collect();

        tracing::info!("found {} candidates", places.len());

        Ok(places)
    }
}

#[cfg(test)]
mod mock {
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    use super::GoogleMaps;
    use crate::config::GoogleMapsConfig;
    use crate::test_support::spawn;

    async fn geocode(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        if params.get("key").map(String::as_str) != Some("test-key") {
            return (StatusCode::OK, Json(json!({ "status": "REQUEST_DENIED", "results": [] })));
        }

        let body = match params.get("address").map(String::as_str) {
            Some("350 5th Ave, New York") => json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "350 5th Ave, New York, NY 10118, USA",
                    "geometry": { "location": { "lat": 40.7484, "lng": -73.9857 } }
                }]
            }),
            Some("ok but empty") => json!({ "status": "OK", "results": [] }),
            Some("off the map") => json!({
                "status": "OK",
                "results": [{ "geometry": { "location": { "lat": 123.0, "lng": 10.0 } } }]
            }),
            Some("over quota") => json!({ "status": "OVER_QUERY_LIMIT", "error_message": "slow down" }),
            Some("broken") => return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
            _ => json!({ "status": "ZERO_RESULTS", "results": [] }),
        };

        (StatusCode::OK, Json(body))
    }

    async fn nearby(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("radius").map(String::as_str) != Some("1500")
            || params.get("type").map(String::as_str) != Some("bar")
        {
            return Json(json!({ "status": "INVALID_REQUEST" }));
        }

        match params.get("location").map(String::as_str) {
            Some("40.7484,-73.9857") => Json(json!({
                "status": "OK",
                "results": [
                    {
                        "name": "The Ginger Man",
                        "geometry": { "location": { "lat": 40.7499, "lng": -73.9834 } },
                        "rating": 4.5
                    },
                    {
                        "name": "Keens Tap",
                        "geometry": { "location": { "lat": 40.7509, "lng": -73.9880 } }
                    },
                    {
                        "name": "",
                        "geometry": { "location": { "lat": 40.7500, "lng": -73.9800 } }
                    },
                    {
                        "name": "Nowhere Lounge",
                        "geometry": { "location": { "lat": 40.7500, "lng": -273.9800 } }
                    }
                ]
            })),
            _ => Json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        }
    }

    pub async fn client() -> GoogleMaps {
        let app = Router::new()
            .route("/maps/api/geocode/json", get(geocode))
            .route("/maps/api/place/nearbysearch/json", get(nearby));

        let addr = spawn(app);

        GoogleMaps::new(&GoogleMapsConfig {
            api_base: format!("http://{}", addr),
            api_key: "test-key".into(),
            place_type: "bar".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }
}

#[tokio::test]
async fn resolves_known_address() {
    let maps = mock::client().await;

    let location = maps.resolve("350 5th Ave, New York").await.unwrap();
    assert_eq!(location, Coordinates::new(40.7484, -73.9857));
}

#[tokio::test]
async fn unknown_address_is_resolution_error() {
    use crate::error::ErrorKind;

    let maps = mock::client().await;

    let err = maps.resolve("nowhere at all").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(err.message.contains("ZERO_RESULTS"));

    let err = maps.resolve("ok but empty").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[tokio::test]
async fn service_failures_are_upstream_errors() {
    use crate::error::ErrorKind;

    let maps = mock::client().await;

    let err = maps.resolve("over quota").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);

    let err = maps.resolve("broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);

    let err = maps.resolve("off the map").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);

    let err = maps
        .find_nearby(Coordinates::new(40.7484, -73.9857), 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn nearby_bars_keep_optional_rating() {
    let maps = mock::client().await;
    let radius_miles = 1500.0 / METERS_PER_MILE;

    let places = maps
        .find_nearby(Coordinates::new(40.7484, -73.9857), radius_miles)
        .await
        .unwrap();

    assert_eq!(
        places,
        vec![
            Place::new("The Ginger Man", Coordinates::new(40.7499, -73.9834), Some(4.5)),
            Place::new("Keens Tap", Coordinates::new(40.7509, -73.9880), None),
        ]
    );

    let places = maps
        .find_nearby(Coordinates::new(0.0, 0.0), radius_miles)
        .await
        .unwrap();
    assert!(places.is_empty());
}
