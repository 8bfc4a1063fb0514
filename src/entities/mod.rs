mod itinerary;
mod location;
mod place;
mod route;

pub use itinerary::{map_url, Itinerary};
pub use location::Coordinates;
pub use place::Place;
pub use route::{Route, Stop};
