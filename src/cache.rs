// =============================================================================
// History Cache — per-query memoization of price-history fetches
// =============================================================================
//
// Re-running the same (symbol, start, end) query must not hit the provider
// again within a session. The cache is plain memoization: no eviction, no
// staleness tracking, process lifetime only. Entries are `Arc`ed so a hit
// hands out a cheap clone of the shared series.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::types::PriceBar;

/// Composite key that identifies one price-history fetch.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct HistoryKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}..{}", self.symbol, self.start, self.end)
    }
}

/// Thread-safe fetch memoization keyed by [`HistoryKey`].
#[derive(Default)]
pub struct HistoryCache {
    entries: RwLock<HashMap<HistoryKey, Arc<Vec<PriceBar>>>>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously stored series.
    pub fn get(&self, key: &HistoryKey) -> Option<Arc<Vec<PriceBar>>> {
        self.entries.read().get(key).cloned()
    }

    /// Store a fetched series and return the shared handle.
    pub fn insert(&self, key: HistoryKey, bars: Vec<PriceBar>) -> Arc<Vec<PriceBar>> {
        let shared = Arc::new(bars);
        self.entries.write().insert(key, shared.clone());
        shared
    }

    /// Number of memoized queries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn key(symbol: &str) -> HistoryKey {
        HistoryKey {
            symbol: symbol.to_string(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn bar(price: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            open: price,
            high: price,
            low: price,
            close: price,
            adjusted_close: price,
            volume: 0,
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = HistoryCache::new();
        assert!(cache.get(&key("AAPL")).is_none());

        cache.insert(key("AAPL"), vec![bar(100.0)]);
        let hit = cache.get(&key("AAPL")).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_ranges_are_distinct_entries() {
        let cache = HistoryCache::new();
        cache.insert(key("AAPL"), vec![bar(100.0)]);

        let mut other = key("AAPL");
        other.end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(cache.get(&other).is_none());

        cache.insert(other, vec![bar(101.0), bar(102.0)]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn hit_shares_the_same_series() {
        let cache = HistoryCache::new();
        let stored = cache.insert(key("MSFT"), vec![bar(300.0)]);
        let hit = cache.get(&key("MSFT")).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[test]
    fn key_display_is_readable() {
        assert_eq!(key("AAPL").to_string(), "AAPL@2023-01-01..2024-01-01");
    }
}
