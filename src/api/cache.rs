use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::traits::Transport;
use super::types::{cache_key, RequestParams};

pub const DEFAULT_CACHE_MINUTES: i64 = 30;
pub const MIN_CACHE_MINUTES: i64 = 1;
pub const MAX_CACHE_MINUTES: i64 = 1440;

/// Clamps a configured TTL into 1..=1440 minutes
pub fn clamp_minutes(minutes: i64) -> i64 {
    minutes.clamp(MIN_CACHE_MINUTES, MAX_CACHE_MINUTES)
}

/// Source of "now" for expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: DateTime<Utc>,
}

/// In-memory response store with a fixed time-to-live
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// TTL in minutes, clamped into 1..=1440
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_clock(ttl_minutes, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl_minutes: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::minutes(clamp_minutes(ttl_minutes)),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Recovered from poisoned response cache lock");
                poisoned.into_inner()
            }
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at) < self.ttl
    }

    /// Fresh entry for `key`; expired entries are dropped
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_fresh(entry, now) {
            return Some(entry.data.clone());
        }
        entries.remove(key);
        None
    }

    pub fn insert(&self, key: impl Into<String>, data: Value) {
        let stored_at = self.clock.now();
        self.lock().insert(key.into(), CacheEntry { data, stored_at });
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Drops everything, returning how many entries were held
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        if count > 0 {
            info!("Cleared {} cached API responses", count);
        }
        count
    }

    /// Drops expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        before - entries.len()
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transport wrapped with the response cache
///
/// Only successful JSON responses are stored. Failures are returned
/// immediately; there are no retries.
pub struct CachedApi<T> {
    transport: T,
    cache: ResponseCache,
}

impl<T: Transport> CachedApi<T> {
    pub fn new(transport: T, cache: ResponseCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `endpoint` with `params` decoded as `R`, from cache when fresh
    ///
    /// Only payloads that decode as `R` are stored.
    pub async fn request<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &RequestParams,
    ) -> Result<R, ApiError> {
        let key = cache_key(endpoint, params);
        if let Some(data) = self.cache.get(&key) {
            match serde_json::from_value(data) {
                Ok(decoded) => {
                    debug!("Cache hit for {} ({})", endpoint, key);
                    return Ok(decoded);
                }
                Err(e) => {
                    warn!("Dropping cached {} entry of another shape: {}", endpoint, e);
                    self.cache.invalidate(&key);
                }
            }
        }
        debug!("Cache miss for {} ({})", endpoint, key);

        let response = match self.transport.get(endpoint, params).await {
            Ok(response) => response,
            Err(err) => {
                warn!("API request failed: {}", err);
                return Err(err);
            }
        };

        if !response.is_success() {
            warn!("{} returned status: {}", endpoint, response.status);
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: response.status,
            });
        }

        let malformed = |e: serde_json::Error| {
            warn!("Could not decode response from {}: {}", endpoint, e);
            ApiError::malformed(endpoint, e)
        };
        let data: Value = serde_json::from_str(&response.body).map_err(malformed)?;
        let decoded = serde_json::from_value(data.clone()).map_err(malformed)?;

        self.cache.insert(key, data);
        Ok(decoded)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::traits::RawResponse;

    /// Clock that only moves when told to
    pub struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        pub fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Transport replaying canned results and recording calls
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
        calls: AtomicUsize,
        pub seen: Mutex<Vec<(String, RequestParams)>>,
    }

    impl ScriptedTransport {
        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(self, err: ApiError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(
            &self,
            endpoint: &str,
            params: &RequestParams,
        ) -> Result<RawResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_string(), params.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ApiError::Transport {
                    endpoint: endpoint.to_string(),
                    message: "no scripted reply".to_string(),
                }))
        }
    }
}
