//! Text helpers for whatever renders place cards.

use crate::models::{Place, MAX_RATING};

/// Description length on result cards
pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;
/// Description length on featured cards
pub const FEATURED_PREVIEW_CHARS: usize = 100;
/// Feature tags shown per card
pub const FEATURE_TAG_LIMIT: usize = 3;
pub const DEFAULT_IMAGE: &str = "/static/images/default-cafe.jpg";

const FEATURE_LABELS: &[(&str, &str)] = &[
    ("wifi", "WiFi"),
    ("outdoor_seating", "Uteservering"),
    ("indoor_seating", "Inomhus"),
    ("wheelchair_accessible", "Rullstolstillgänglig"),
    ("kanelbullar", "Kanelbullar"),
    ("prinsesstarta", "Prinsesstårta"),
    ("coffee", "Kaffe"),
    ("tea", "Te"),
    ("pastries", "Bakverk"),
    ("sandwiches", "Smörgåsar"),
    ("lunch", "Lunch"),
    ("breakfast", "Frukost"),
];

/// Label for a feature tag: known tags get their Swedish label, others are
/// split on `_` and title-cased (`stone_oven` → `Stone Oven`).
pub fn feature_label(tag: &str) -> String {
    if let Some((_, label)) = FEATURE_LABELS.iter().find(|(key, _)| *key == tag) {
        return (*label).to_string();
    }
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `limit` tags of a place, labelled
pub fn feature_labels(place: &Place, limit: usize) -> Vec<String> {
    place
        .features
        .iter()
        .take(limit)
        .map(|tag| feature_label(tag))
        .collect()
}

/// Cuts `text` to `limit` characters, adding `...` when something was dropped
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Five-star bar for a rating, full stars rounded down
pub fn stars(rating: f64) -> String {
    let full = rating.clamp(0.0, MAX_RATING).floor() as usize;
    let max = MAX_RATING as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(max - full))
}

pub fn image_or_default(place: &Place) -> &str {
    place.primary_image().unwrap_or(DEFAULT_IMAGE)
}

/// Listing flags carried by shortcodes and widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    pub city: Option<String>,
    pub limit: usize,
    pub show_description: bool,
    pub show_rating: bool,
    /// Description preview length in characters
    pub description_chars: usize,
}

impl ListingOptions {
    pub const CITY_LIMIT: usize = 6;
    pub const FEATURED_LIMIT: usize = 3;

    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            limit: Self::CITY_LIMIT,
            show_description: true,
            show_rating: true,
            description_chars: DESCRIPTION_PREVIEW_CHARS,
        }
    }

    pub fn featured() -> Self {
        Self {
            city: None,
            limit: Self::FEATURED_LIMIT,
            show_description: true,
            show_rating: true,
            description_chars: FEATURED_PREVIEW_CHARS,
        }
    }

    /// Applies `limit`, `city`, `show_description` and `show_rating` attributes
    /// on top of `self`; unparsable values keep the current setting.
    pub fn with_attributes<'a, I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in attributes {
            let value = value.trim();
            match key {
                "city" if !value.is_empty() => self.city = Some(value.to_string()),
                "limit" => {
                    if let Some(limit) = value.parse().ok().filter(|n: &usize| *n > 0) {
                        self.limit = limit;
                    }
                }
                "show_description" => self.show_description = flag(value, self.show_description),
                "show_rating" => self.show_rating = flag(value, self.show_rating),
                _ => {}
            }
        }
        self
    }
}

fn flag(value: &str, current: bool) -> bool {
    match value {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => current,
    }
}

/// Plain-text card for terminal output
pub fn card(place: &Place, options: &ListingOptions) -> String {
    let mut lines = vec![format!("{} · 📍 {}", place.name, place.location())];
    if options.show_rating {
        lines.push(format!("   {} {:.1}", stars(place.rating()), place.rating()));
    }
    if options.show_description {
        if let Some(description) = place.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("   {}", truncate(description, options.description_chars)));
        }
    }
    let tags = feature_labels(place, FEATURE_TAG_LIMIT);
    if !tags.is_empty() {
        lines.push(format!("   [{}]", tags.join("] [")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> Place {
        Place {
            id: 28,
            name: "St. Jakobs Stenugnsbageri".into(),
            city: "Malmö".into(),
            address: Some("S:t Paulsgatan 25, S:t Pauli".into()),
            description: Some("Stone-oven bakery.".into()),
            rating: Some(4.4),
            features: vec![
                "artisanal".into(),
                "outdoor_seating".into(),
                "stone_oven".into(),
                "wifi".into(),
            ],
            images: vec![],
        }
    }

    #[test]
    fn known_and_unknown_feature_labels() {
        assert_eq!(feature_label("outdoor_seating"), "Uteservering");
        assert_eq!(feature_label("stone_oven"), "Stone Oven");
        assert_eq!(feature_label("harbor_views"), "Harbor Views");
    }

    #[test]
    fn only_first_three_tags_are_shown() {
        assert_eq!(
            feature_labels(&place(), FEATURE_TAG_LIMIT),
            vec!["Artisanal", "Uteservering", "Stone Oven"]
        );
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Kanelbullar", 20), "Kanelbullar");
        assert_eq!(truncate("Prinsesstårta", 12), "Prinsesstårt...");
        assert_eq!(truncate("åäö", 3), "åäö");
    }

    #[test]
    fn stars_round_down() {
        assert_eq!(stars(4.7), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(9.0), "★★★★★");
    }

    #[test]
    fn default_image_when_none_stored() {
        assert_eq!(image_or_default(&place()), DEFAULT_IMAGE);
    }

    #[test]
    fn attributes_override_listing_defaults() {
        let options = ListingOptions::city("stockholm").with_attributes([
            ("limit", "4"),
            ("show_description", "false"),
            ("show_rating", "maybe"),
        ]);
        assert_eq!(options.limit, 4);
        assert!(!options.show_description);
        assert!(options.show_rating);

        let options = ListingOptions::featured().with_attributes([("limit", "-1")]);
        assert_eq!(options.limit, 3);
    }

    #[test]
    fn card_respects_flags() {
        let options = ListingOptions::featured().with_attributes([("show_description", "no")]);
        let text = card(&place(), &options);
        assert!(text.contains("S:t Paulsgatan 25"));
        assert!(text.contains("★★★★☆ 4.4"));
        assert!(!text.contains("Stone-oven"));
    }
}
