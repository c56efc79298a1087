//! TTL-bounded in-memory cache of lookup results.
//!
//! An explicit, constructible component owned by the lookup service
//! rather than ambient process-wide state. Eviction is lazy on read; no
//! background timers are involved. The clock is injected so expiry is
//! testable without real waiting.

use patente_core::{PlateNumber, VehicleRecord};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Time source for cache expiry decisions.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the system monotonic clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    record: VehicleRecord,
    inserted_at: Instant,
}

/// Concurrent read/insert cache keyed by canonical plate number.
///
/// An entry inserted at time `t` is live for reads in `[t, t+TTL)` and
/// expired from `t+TTL` on. Expired entries are removed on the read that
/// observes them, or in bulk via [`ResultCache::purge_expired`].
pub struct ResultCache {
    entries: RwLock<HashMap<PlateNumber, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    /// Cache with the given TTL and the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Cache with an injected clock, for deterministic expiry tests.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Fetch a live entry, evicting it instead if it has expired.
    pub async fn get(&self, plate: &PlateNumber) -> Option<VehicleRecord> {
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(plate) {
                Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                    return Some(entry.record.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Entry was expired under the read lock; re-check under the write
        // lock since it may have been refreshed in between
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(plate) {
            if now.duration_since(entry.inserted_at) < self.ttl {
                return Some(entry.record.clone());
            }
            entries.remove(plate);
            tracing::debug!(plate = %plate, "evicted expired cache entry");
        }
        None
    }

    /// Insert a record, stamped with the current time. Replaces any
    /// existing entry for the same plate.
    pub async fn insert(&self, record: VehicleRecord) {
        let inserted_at = self.clock.now();
        let plate = record.plate_number.clone();
        let mut entries = self.entries.write().await;
        entries.insert(
            plate,
            CacheEntry {
                record,
                inserted_at,
            },
        );
    }

    /// Remove every expired entry, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        before - entries.len()
    }

    /// Number of entries currently stored, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patente_core::VehicleInfo;
    use std::sync::Mutex;

    /// Manually advanced clock for expiry tests.
    pub struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        pub fn advance(&self, by: Duration) {
            *self.offset.lock().expect("clock lock") += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().expect("clock lock")
        }
    }

    fn record(value: &str) -> VehicleRecord {
        let plate = PlateNumber::new(value).expect("valid plate");
        VehicleRecord::clean(plate, VehicleInfo::unavailable(), 98.0, "test")
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = ResultCache::new(Duration::from_secs(3600));
        let rec = record("AB1234");
        cache.insert(rec.clone()).await;

        let hit = cache.get(&rec.plate_number).await;
        assert_eq!(hit, Some(rec));
    }

    #[tokio::test]
    async fn test_miss_for_unknown_plate() {
        let cache = ResultCache::new(Duration::from_secs(3600));
        let plate = PlateNumber::new("ZZ9999").expect("valid plate");
        assert_eq!(cache.get(&plate).await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_at_ttl_boundary() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(Duration::from_secs(60), clock.clone());
        let rec = record("AB1234");
        cache.insert(rec.clone()).await;

        clock.advance(Duration::from_secs(59));
        assert!(cache.get(&rec.plate_number).await.is_some());

        // Exactly at t+TTL the entry is no longer live
        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&rec.plate_number).await.is_none());

        // Expired read evicted the entry
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_refreshes_timestamp() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(Duration::from_secs(60), clock.clone());
        let rec = record("AB1234");

        cache.insert(rec.clone()).await;
        clock.advance(Duration::from_secs(45));
        cache.insert(rec.clone()).await;
        clock.advance(Duration::from_secs(45));

        // 90s after the first insert but only 45s after the refresh
        assert!(cache.get(&rec.plate_number).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_expired_sweeps_in_bulk() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResultCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.insert(record("AB1234")).await;
        cache.insert(record("CD5678")).await;
        clock.advance(Duration::from_secs(30));
        cache.insert(record("JVJV20")).await;
        clock.advance(Duration::from_secs(40));

        let purged = cache.purge_expired().await;
        assert_eq!(purged, 2);
        assert_eq!(cache.len().await, 1);
    }
}
