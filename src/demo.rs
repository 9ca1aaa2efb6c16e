//! Built-in catalogue of fika places for offline use.

use crate::models::Place;

const DEMO_PLACES: &str = include_str!("../data/demo_places.json");

/// Stockholm, Gothenburg and Malmö cafés
pub fn places() -> Result<Vec<Place>, serde_json::Error> {
    serde_json::from_str(DEMO_PLACES)
}
