use serde::{Deserialize, Serialize};

/// Highest rating a place can carry
pub const MAX_RATING: f64 = 5.0;

/// A café / fika location as delivered by the data source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawPlace")]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    /// Feature / specialty tags, in stored order
    pub features: Vec<String>,
    /// Image URLs, the first one is the primary image
    pub images: Vec<String>,
}

impl Place {
    /// Rating clamped to [0, 5], missing ratings count as 0
    pub fn rating(&self) -> f64 {
        self.rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, MAX_RATING))
            .unwrap_or(0.0)
    }

    /// Address for display, falling back to the city
    pub fn location(&self) -> &str {
        match self.address.as_deref() {
            Some(address) if !address.is_empty() => address,
            _ => &self.city,
        }
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn has_feature(&self, tag: &str) -> bool {
        self.features.iter().any(|f| f == tag)
    }
}

/// Wire shape of a place. The API may send tags as `fika_specialties`
/// and arrays as `null`.
#[derive(Deserialize)]
struct RawPlace {
    id: i64,
    name: String,
    city: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    features: Option<Vec<String>>,
    #[serde(default)]
    fika_specialties: Option<Vec<String>>,
    #[serde(default)]
    images: Option<Vec<String>>,
}

impl From<RawPlace> for Place {
    fn from(raw: RawPlace) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            city: raw.city,
            address: raw.address,
            description: raw.description,
            rating: raw.rating.map(|r| r.clamp(0.0, MAX_RATING)),
            features: raw.features.or(raw.fika_specialties).unwrap_or_default(),
            images: raw.images.unwrap_or_default(),
        }
    }
}

/// One page of places
///
/// `pages` is 0 when `total` is 0, otherwise `ceil(total / per_page)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub places: Vec<Place>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

impl SearchResult {
    /// Single page holding every given place
    pub fn single_page(places: Vec<Place>) -> Self {
        let total = places.len();
        Self {
            places,
            total,
            page: 1,
            pages: usize::from(total > 0),
            per_page: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Number of places listed for a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawCityCount")]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCityCount {
    Counted {
        city: String,
        #[serde(default)]
        count: usize,
    },
    Name(String),
}

impl From<RawCityCount> for CityCount {
    fn from(raw: RawCityCount) -> Self {
        match raw {
            RawCityCount::Counted { city, count } => Self { city, count },
            RawCityCount::Name(city) => Self { city, count: 0 },
        }
    }
}
