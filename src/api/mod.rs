pub mod cache;
pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use cache::{CachedApi, Clock, ResponseCache, SystemClock};
pub use client::HttpTransport;
pub use error::ApiError;
pub use traits::{RawResponse, Transport};
pub use types::{cache_key, ParamValue, RequestParams};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::config::Settings;
use crate::models::{CityCount, SearchResult};

pub const PLACES_ENDPOINT: &str = "places";
pub const SEARCH_ENDPOINT: &str = "places/search";
pub const CITIES_ENDPOINT: &str = "places/cities";

/// Page size used for free-text searches
pub const SEARCH_PER_PAGE: usize = 20;

#[derive(Deserialize)]
struct CitiesResponse {
    cities: Vec<CityCount>,
}

/// Typed access to the fika API through the response cache
pub struct FikaApi<T = HttpTransport> {
    inner: CachedApi<T>,
}

impl FikaApi<HttpTransport> {
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let transport = HttpTransport::from_settings(settings)?;
        Ok(Self::new(transport, ResponseCache::new(settings.cache_minutes)))
    }
}

impl<T: Transport> FikaApi<T> {
    pub fn new(transport: T, cache: ResponseCache) -> Self {
        Self {
            inner: CachedApi::new(transport, cache),
        }
    }

    pub fn cached(&self) -> &CachedApi<T> {
        &self.inner
    }

    /// Places in one city
    pub async fn city_places(&self, city: &str, limit: usize) -> Result<SearchResult, ApiError> {
        let params = RequestParams::new()
            .with("city", city.trim())
            .with("per_page", limit);
        self.fetch(PLACES_ENDPOINT, &params).await
    }

    /// Verified places for the featured listing
    pub async fn featured_places(&self, limit: usize) -> Result<SearchResult, ApiError> {
        let params = RequestParams::new()
            .with("verified_only", "true")
            .with("per_page", limit);
        self.fetch(PLACES_ENDPOINT, &params).await
    }

    /// Free-text search, optionally narrowed to a city
    pub async fn search_places(&self, query: &str, city: &str) -> Result<SearchResult, ApiError> {
        let (query, city) = (query.trim(), city.trim());
        if query.is_empty() && city.is_empty() {
            return Err(ApiError::MissingCriteria);
        }

        let mut params = RequestParams::new().with("per_page", SEARCH_PER_PAGE);
        if !query.is_empty() {
            params.insert("query", query);
        }
        if !city.is_empty() {
            params.insert("city", city);
        }
        self.fetch(SEARCH_ENDPOINT, &params).await
    }

    /// Cities with their place counts
    pub async fn cities(&self) -> Result<Vec<CityCount>, ApiError> {
        let response: CitiesResponse = self.fetch(CITIES_ENDPOINT, &RequestParams::new()).await?;
        Ok(response.cities)
    }

    /// Uncached round trip used to check the API configuration
    pub async fn ping(&self) -> Result<(), ApiError> {
        let params = RequestParams::new().with("per_page", 1_usize);
        let response = self.inner.transport().get(PLACES_ENDPOINT, &params).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                endpoint: PLACES_ENDPOINT.to_string(),
                status: response.status,
            });
        }
        serde_json::from_str::<SearchResult>(&response.body)
            .map_err(|e| ApiError::malformed(PLACES_ENDPOINT, e))?;
        info!("✅ Connection to fika API successful");
        Ok(())
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &RequestParams,
    ) -> Result<R, ApiError> {
        self.inner.request(endpoint, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::cache::testing::ScriptedTransport;
    use super::*;

    const PAGE: &str = r#"{
        "places": [{"id": 1, "name": "Café Saturnus", "city": "Stockholm",
                    "rating": 4.7, "features": ["kanelbullar", "wifi"]}],
        "total": 1, "page": 1, "pages": 1, "per_page": 20
    }"#;

    fn api(transport: ScriptedTransport) -> FikaApi<ScriptedTransport> {
        FikaApi::new(transport, ResponseCache::new(30))
    }

    #[tokio::test]
    async fn search_requires_query_or_city() {
        let api = api(ScriptedTransport::default());
        assert_eq!(api.search_places("  ", "").await.unwrap_err(), ApiError::MissingCriteria);
        assert_eq!(api.cached().transport().calls(), 0);
    }

    #[tokio::test]
    async fn search_sends_only_given_criteria() {
        let api = api(ScriptedTransport::default().reply(200, PAGE));
        let result = api.search_places(" kanel ", "").await.unwrap();

        assert_eq!(result.places[0].name, "Café Saturnus");
        let seen = api.cached().transport().seen.lock().unwrap();
        let (endpoint, params) = &seen[0];
        assert_eq!(endpoint, SEARCH_ENDPOINT);
        assert_eq!(params.get("query"), Some(&ParamValue::from("kanel")));
        assert_eq!(params.get("per_page"), Some(&ParamValue::Int(20)));
        assert!(params.get("city").is_none());
    }

    #[tokio::test]
    async fn featured_asks_for_verified_places() {
        let api = api(ScriptedTransport::default().reply(200, PAGE));
        api.featured_places(3).await.unwrap();

        let seen = api.cached().transport().seen.lock().unwrap();
        assert_eq!(seen[0].1.get("verified_only"), Some(&ParamValue::from("true")));
        assert_eq!(seen[0].1.get("per_page"), Some(&ParamValue::Int(3)));
    }

    #[tokio::test]
    async fn wrong_shape_is_malformed_and_retried() {
        let api = api(
            ScriptedTransport::default()
                .reply(200, r#"{"items": []}"#)
                .reply(200, PAGE),
        );
        let err = api.city_places("stockholm", 6).await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
        assert!(api.cached().cache().is_empty());

        let result = api.city_places("stockholm", 6).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(api.cached().transport().calls(), 2);
    }

    #[tokio::test]
    async fn cities_are_unwrapped() {
        let api = api(
            ScriptedTransport::default()
                .reply(200, r#"{"cities": [{"city": "Malmö", "count": 10}, "Lund"]}"#),
        );
        let cities = api.cities().await.unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].count, 10);
        assert_eq!(cities[1].city, "Lund");
    }

    #[tokio::test]
    async fn ping_bypasses_cache() {
        let api = api(ScriptedTransport::default().reply(200, PAGE).reply(500, "{}"));
        api.ping().await.unwrap();
        assert!(api.cached().cache().is_empty());
        assert!(matches!(api.ping().await, Err(ApiError::Status { status: 500, .. })));
    }
}
