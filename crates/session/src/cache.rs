//! TTL cache for read-mostly reference data
//!
//! Leave-type lists change rarely but are needed on every extraction pass.
//! Reads may return data up to one TTL stale; refresh writes may race
//! harmlessly since the value is idempotent per key.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use hr_agent_core::Clock;
use std::sync::Arc;

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Generic TTL cache with an injected clock
pub struct TtlCache<V: Clone + Send + Sync> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(1800)),
            clock,
        }
    }

    /// Get a live value, if present
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Store a value, resetting its TTL
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: self.clock.now() + self.ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_agent_core::ManualClock;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_get_put_expiry() {
        let clock = Arc::new(ManualClock::at_date(
            chrono::NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        ));
        let cache: TtlCache<Vec<String>> =
            TtlCache::new(StdDuration::from_secs(1800), clock.clone());

        assert!(cache.get("240611").is_none());
        cache.put("240611", vec!["Sick Leave".to_string()]);
        assert_eq!(cache.get("240611").unwrap(), vec!["Sick Leave".to_string()]);

        clock.advance(Duration::minutes(31));
        assert!(cache.get("240611").is_none());
    }

    #[test]
    fn test_put_refreshes_ttl() {
        let clock = Arc::new(ManualClock::at_date(
            chrono::NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        ));
        let cache: TtlCache<u32> = TtlCache::new(StdDuration::from_secs(60), clock.clone());

        cache.put("k", 1);
        clock.advance(Duration::seconds(50));
        cache.put("k", 2);
        clock.advance(Duration::seconds(50));
        assert_eq!(cache.get("k"), Some(2));
    }
}
