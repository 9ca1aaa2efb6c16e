use serde::{Deserialize, Serialize};

use super::filter::canonical_city;

/// Sentinel value meaning "clear this filter"
pub const ALL: &str = "all";

/// Current search / filter selections of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub query: String,
    /// Canonical city display name, empty for no filter
    pub city: String,
    /// Seating-style feature tag
    pub feature: String,
    /// Fika specialty tag
    pub specialty: String,
    /// 1-based
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            city: String::new(),
            feature: String::new(),
            specialty: String::new(),
            page: 1,
        }
    }
}

/// Value of a tag/city filter when it constrains results
pub fn active(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != ALL).then_some(value)
}

impl FilterState {
    /// Builds the initial state from shortcode-style attributes
    ///
    /// Recognized keys: `query`, `city`, `feature`, `specialty`, `page`.
    /// Unknown keys are ignored and an unparsable page falls back to 1.
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::default();
        for (key, value) in attributes {
            let value = value.trim();
            match key {
                "query" => state.query = value.to_string(),
                "city" => {
                    state.city = match active(value) {
                        Some(key) => canonical_city(key),
                        None => value.to_string(),
                    }
                }
                "feature" => state.feature = value.to_string(),
                "specialty" => state.specialty = value.to_string(),
                "page" => state.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => {}
            }
        }
        state
    }

    /// True when any selection holds the `"all"` sentinel
    pub fn wants_default_view(&self) -> bool {
        [&self.city, &self.feature, &self.specialty]
            .iter()
            .any(|value| value.trim() == ALL)
    }

    pub fn has_active_filters(&self) -> bool {
        super::matcher::searchable_query(&self.query).is_some()
            || active(&self.city).is_some()
            || active(&self.feature).is_some()
            || active(&self.specialty).is_some()
    }

    /// Clears every selection and goes back to page 1
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
