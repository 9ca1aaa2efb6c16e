use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Prefix of every response cache key
pub const CACHE_KEY_PREFIX: &str = "fika_api_";

/// Scalar query parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&ParamValue> for Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Text(text) => Value::from(text.as_str()),
            ParamValue::Int(n) => Value::from(*n),
            ParamValue::Bool(b) => Value::from(*b),
        }
    }
}

/// Query parameters of one API request, kept sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestParams(BTreeMap<String, ParamValue>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs for the URL query string
    pub fn query_pairs(&self) -> Vec<(&str, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.to_string()))
            .collect()
    }

    /// JSON object with sorted keys; equal parameter sets give equal text
    pub fn canonical(&self) -> String {
        let object: Map<String, Value> = self
            .0
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value)))
            .collect();
        Value::Object(object).to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Cache key for a request: prefix plus SHA-256 of endpoint and canonical params
pub fn cache_key(endpoint: &str, params: &RequestParams) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b"\n");
    hasher.update(params.canonical().as_bytes());
    format!("{CACHE_KEY_PREFIX}{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_parameter_order() {
        let a = RequestParams::from_iter([
            ("city", ParamValue::from("Stockholm")),
            ("per_page", ParamValue::from(6_i64)),
        ]);
        let b = RequestParams::new()
            .with("per_page", 6_i64)
            .with("city", "Stockholm");

        assert_eq!(cache_key("places", &a), cache_key("places", &b));
        assert_eq!(a.canonical(), r#"{"city":"Stockholm","per_page":6}"#);
    }

    #[test]
    fn key_depends_on_endpoint_and_values() {
        let params = RequestParams::new().with("per_page", 6_i64);
        let key = cache_key("places", &params);

        assert!(key.starts_with(CACHE_KEY_PREFIX));
        assert_eq!(key.len(), CACHE_KEY_PREFIX.len() + 64);
        assert_ne!(key, cache_key("places/search", &params));
        assert_ne!(key, cache_key("places", &RequestParams::new().with("per_page", 3_i64)));
        assert_ne!(key, cache_key("places", &RequestParams::new().with("per_page", "6")));
    }

    #[test]
    fn query_pairs_render_scalars() {
        let params = RequestParams::new()
            .with("verified_only", true)
            .with("per_page", 3_usize);
        assert_eq!(
            params.query_pairs(),
            vec![("per_page", "3".to_string()), ("verified_only", "true".to_string())]
        );
    }
}
