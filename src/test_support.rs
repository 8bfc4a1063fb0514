//! Stub collaborators and an in-process server helper for tests.

use async_trait::async_trait;
use axum::Router;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};

use crate::api::{AddressResolver, PlaceFinder};
use crate::config::PlannerConfig;
use crate::engine::Engine;
use crate::entities::{Coordinates, Place};
use crate::error::Error;

/// Serves `app` on an ephemeral local port for the rest of the test.
pub fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    addr
}

/// Resolver answering every address with the same result.
#[derive(Clone, Debug)]
pub struct StubResolver {
    result: Result<Coordinates, Error>,
}

impl StubResolver {
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            result: Ok(coordinates),
        }
    }

    pub fn failing(error: Error) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl AddressResolver for StubResolver {
    async fn resolve(&self, _address: &str) -> Result<Coordinates, Error> {
        self.result.clone()
    }
}

/// Finder returning a fixed candidate list and remembering the last radius asked for.
#[derive(Clone, Debug, Default)]
pub struct StubFinder {
    places: Vec<Place>,
    last_radius: Arc<Mutex<Option<f64>>>,
}

impl StubFinder {
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places,
            ..Default::default()
        }
    }

    pub fn last_radius(&self) -> Option<f64> {
        *self.last_radius.lock().unwrap()
    }
}

#[async_trait]
impl PlaceFinder for StubFinder {
    async fn find_nearby(
        &self,
        _center: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<Place>, Error> {
        *self.last_radius.lock().unwrap() = Some(radius_miles);
        Ok(self.places.clone())
    }
}

pub fn engine(resolver: StubResolver, finder: StubFinder) -> Engine {
    Engine::with_collaborators(Arc::new(resolver), Arc::new(finder), PlannerConfig::default())
}

/// A, B and C due north of the origin at 1, 5 and 2 degrees.
pub fn equator_bars() -> Vec<Place> {
    vec![
        Place::new("A", Coordinates::new(1.0, 0.0), Some(4.2)),
        Place::new("B", Coordinates::new(5.0, 0.0), None),
        Place::new("C", Coordinates::new(2.0, 0.0), Some(3.9)),
    ]
}
