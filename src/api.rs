use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Coordinates, Itinerary, Place};
use crate::error::Error;

#[async_trait]
pub trait AddressResolver {
    /// Turns a free-text address into coordinates.
    async fn resolve(&self, address: &str) -> Result<Coordinates, Error>;
}

#[async_trait]
pub trait PlaceFinder {
    /// Candidate places within `radius_miles` of `center`. May be empty.
    async fn find_nearby(&self, center: Coordinates, radius_miles: f64)
        -> Result<Vec<Place>, Error>;
}

#[async_trait]
pub trait ItineraryAPI {
    /// Plans a walking route from `address`. `None` uses the configured stop count.
    async fn create_itinerary(&self, address: String, stops: Option<i64>)
        -> Result<Itinerary, Error>;
}

pub trait API: ItineraryAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
