mod itinerary_api;

use std::sync::Arc;

use crate::{
    api::{AddressResolver, PlaceFinder, API},
    config::{Config, PlannerConfig},
    error::Error,
    external::google_maps::GoogleMaps,
};

pub type DynResolver = Arc<dyn AddressResolver + Send + Sync>;
pub type DynFinder = Arc<dyn PlaceFinder + Send + Sync>;

pub struct Engine {
    resolver: DynResolver,
    finder: DynFinder,
    planner: PlannerConfig,
}

impl Engine {
    /// Engine backed by Google Maps for both geocoding and place search.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let maps = Arc::new(GoogleMaps::new(&config.google_maps)?);

        Ok(Self::with_collaborators(
            maps.clone(),
            maps,
            config.planner.clone(),
        ))
    }

    pub fn with_collaborators(
        resolver: DynResolver,
        finder: DynFinder,
        planner: PlannerConfig,
    ) -> Self {
        Self {
            resolver,
            finder,
            planner,
        }
    }
}

impl API for Engine {}
