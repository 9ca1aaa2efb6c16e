use tracing::debug;

use super::matcher::{self, searchable_query};
use super::state::{active, FilterState};
use crate::models::Place;

/// Known city keys and their display names
pub const CITIES: &[(&str, &str)] = &[
    ("stockholm", "Stockholm"),
    ("gothenburg", "Gothenburg"),
    ("malmo", "Malmö"),
    ("uppsala", "Uppsala"),
    ("vasteras", "Västerås"),
];

const FEATURE_TITLES: &[(&str, &str)] = &[
    ("outdoor_seating", "Outdoor Seating"),
    ("indoor_seating", "Indoor Seating"),
];

const SPECIALTY_TITLES: &[(&str, &str)] = &[
    ("kanelbullar", "Kanelbullar (Cinnamon Buns)"),
    ("prinsesstarta", "Prinsesstårta (Princess Cake)"),
    ("wifi", "WiFi Available"),
];

/// Result of running the filter pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// A filter was reset with `"all"`, the caller shows its default view
    ShowAll,
    /// Places passing every active filter, in input order (may be empty)
    Filtered { title: String, places: Vec<Place> },
}

impl FilterOutcome {
    pub fn places(&self) -> Option<&[Place]> {
        match self {
            Self::ShowAll => None,
            Self::Filtered { places, .. } => Some(places),
        }
    }
}

/// Maps a city key such as `malmo` to its display name
///
/// Unknown keys keep their spelling with the first letter upper-cased.
pub fn canonical_city(key: &str) -> String {
    let key = key.trim();
    let lowered = key.to_lowercase();
    if let Some((_, name)) = CITIES.iter().find(|(k, _)| *k == lowered) {
        return (*name).to_string();
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lookup<'a>(table: &'a [(&str, &'a str)], tag: &'a str) -> &'a str {
    table
        .iter()
        .find(|(key, _)| *key == tag)
        .map_or(tag, |(_, title)| *title)
}

/// True when the place passes every active filter of `state`
pub fn accepts(place: &Place, state: &FilterState) -> bool {
    if let Some(city) = active(&state.city) {
        if place.city != canonical_city(city) {
            return false;
        }
    }
    if let Some(tag) = active(&state.feature) {
        if !place.has_feature(tag) {
            return false;
        }
    }
    if let Some(tag) = active(&state.specialty) {
        if !place.has_feature(tag) {
            return false;
        }
    }
    match searchable_query(&state.query) {
        Some(query) => matcher::matches(query, place),
        None => true,
    }
}

/// Heading for a filtered listing
pub fn title(state: &FilterState) -> String {
    if let Some(query) = searchable_query(&state.query) {
        format!("Search results for \"{query}\"")
    } else if let Some(city) = active(&state.city) {
        format!("Places in {}", canonical_city(city))
    } else if let Some(tag) = active(&state.feature) {
        format!("Places with {}", lookup(FEATURE_TITLES, tag))
    } else if let Some(tag) = active(&state.specialty) {
        format!("Places with {}", lookup(SPECIALTY_TITLES, tag))
    } else {
        "All places".to_string()
    }
}

/// Filters `places` by every active selection in `state`
pub fn apply(places: &[Place], state: &FilterState) -> FilterOutcome {
    if state.wants_default_view() {
        return FilterOutcome::ShowAll;
    }

    let matched: Vec<Place> = places
        .iter()
        .filter(|place| accepts(place, state))
        .cloned()
        .collect();

    debug!(
        "Filter kept {} of {} places (query={:?}, city={:?}, feature={:?}, specialty={:?})",
        matched.len(),
        places.len(),
        state.query,
        state.city,
        state.feature,
        state.specialty
    );

    FilterOutcome::Filtered {
        title: title(state),
        places: matched,
    }
}
