use crate::models::Place;

/// Queries shorter than this are never applied
pub const MIN_QUERY_CHARS: usize = 2;

/// Trimmed query, or `None` when it is too short to search with
pub fn searchable_query(raw: &str) -> Option<&str> {
    let query = raw.trim();
    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

/// Case-insensitive substring match against name, city, description and
/// every feature tag. An empty query matches nothing.
pub fn matches(query: &str, place: &Place) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }
    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    contains(place.name.as_str())
        || contains(place.city.as_str())
        || place.description.as_deref().is_some_and(contains)
        || place.features.iter().any(|f| contains(f.as_str()))
}
