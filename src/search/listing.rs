use std::collections::BTreeMap;

use crate::models::{CityCount, Place};

/// Lowest rating a place needs to be featured
pub const FEATURED_MIN_RATING: f64 = 4.0;

/// Best-rated places, optionally within one city, highest rating first
///
/// Places with equal ratings keep their collection order.
pub fn featured(places: &[Place], city: Option<&str>, limit: usize) -> Vec<Place> {
    let mut picked: Vec<&Place> = places
        .iter()
        .filter(|place| place.rating() >= FEATURED_MIN_RATING)
        .filter(|place| city.map_or(true, |city| place.city == city))
        .collect();
    picked.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    picked.into_iter().take(limit).cloned().collect()
}

/// Places per city, sorted by city name
pub fn city_counts(places: &[Place]) -> Vec<CityCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for place in places {
        *counts.entry(place.city.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        })
        .collect()
}
