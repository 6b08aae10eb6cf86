use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// Identity of a cached query. Consumers asking for the same key share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    MediaList,
}

impl QueryKey {
    /// API path the query reads from.
    pub fn path(&self) -> &'static str {
        match self {
            Self::MediaList => "/api/media",
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
    stale: bool,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    /// Bumped by every invalidation, whether or not an entry exists yet.
    generations: HashMap<QueryKey, u64>,
}

impl<V> CacheState<V> {
    fn generation(&self, key: QueryKey) -> u64 {
        self.generations.get(&key).copied().unwrap_or(0)
    }
}

/// Client-side query cache. Entries are advisory copies of server state and
/// are marked stale by [`QueryCache::invalidate`] after every successful write.
///
/// A fetch that was in flight when an invalidation happened must not store its
/// result as fresh: read [`QueryCache::generation`] before sending and hand it
/// back to [`QueryCache::insert_fetched`].
#[derive(Debug)]
pub struct QueryCache<V> {
    state: Arc<RwLock<CacheState<V>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                entries: HashMap::new(),
                generations: HashMap::new(),
            })),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value if present and not stale.
    pub fn get(&self, key: QueryKey) -> Option<V> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .entries
            .get(&key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.clone())
    }

    /// The cached value even if stale, for showing while a refetch runs.
    pub fn peek(&self, key: QueryKey) -> Option<V> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(&key).map(|entry| entry.value.clone())
    }

    /// When the entry for `key` was last stored.
    pub fn updated_at(&self, key: QueryKey) -> Option<Instant> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(&key).map(|entry| entry.fetched_at)
    }

    /// Current invalidation generation of `key`.
    pub fn generation(&self, key: QueryKey) -> u64 {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.generation(key)
    }

    /// Stores `value` as fresh.
    pub fn insert(&self, key: QueryKey, value: V) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                stale: false,
            },
        );
    }

    /// Stores the result of a fetch started at generation `started_at`. The
    /// value is kept fresh only if no invalidation happened since; otherwise
    /// it is stored stale so the next read goes back to the server.
    /// Returns whether the value was stored fresh.
    pub fn insert_fetched(&self, key: QueryKey, value: V, started_at: u64) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let fresh = state.generation(key) == started_at;
        if !fresh {
            tracing::debug!("Discarding freshness of {:?}: invalidated during fetch", key);
        }
        state.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                stale: !fresh,
            },
        );
        fresh
    }

    pub fn invalidate(&self, key: QueryKey) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state.generations.entry(key).or_insert(0) += 1;
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.stale = true;
        }
        tracing::debug!("Invalidated {:?}", key);
    }

    /// True when the key has no entry or its entry was invalidated.
    pub fn is_stale(&self, key: QueryKey) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.get(&key).map_or(true, |entry| entry.stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_is_stale() {
        let cache: QueryCache<Vec<i64>> = QueryCache::new();
        assert!(cache.is_stale(QueryKey::MediaList));
        assert_eq!(cache.get(QueryKey::MediaList), None);
    }

    #[test]
    fn test_insert_then_invalidate() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::MediaList, vec![1, 2]);
        assert!(!cache.is_stale(QueryKey::MediaList));
        assert_eq!(cache.get(QueryKey::MediaList), Some(vec![1, 2]));

        cache.invalidate(QueryKey::MediaList);
        assert!(cache.is_stale(QueryKey::MediaList));
        assert_eq!(cache.get(QueryKey::MediaList), None);
        assert_eq!(cache.peek(QueryKey::MediaList), Some(vec![1, 2]));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = QueryCache::new();
        let other = cache.clone();
        cache.insert(QueryKey::MediaList, vec![7]);
        assert_eq!(other.get(QueryKey::MediaList), Some(vec![7]));

        other.invalidate(QueryKey::MediaList);
        assert!(cache.is_stale(QueryKey::MediaList));
    }

    #[test]
    fn test_invalidate_missing_key_is_noop() {
        let cache: QueryCache<Vec<i64>> = QueryCache::new();
        cache.invalidate(QueryKey::MediaList);
        assert_eq!(cache.peek(QueryKey::MediaList), None);
    }

    #[test]
    fn test_invalidation_during_fetch_keeps_result_stale() {
        let cache = QueryCache::new();
        let started_at = cache.generation(QueryKey::MediaList);

        // A write lands while the fetch is still in flight, before any entry exists.
        cache.invalidate(QueryKey::MediaList);

        assert!(!cache.insert_fetched(QueryKey::MediaList, vec![1], started_at));
        assert!(cache.is_stale(QueryKey::MediaList));
        assert_eq!(cache.get(QueryKey::MediaList), None);
        assert_eq!(cache.peek(QueryKey::MediaList), Some(vec![1]));
    }

    #[test]
    fn test_uninterrupted_fetch_is_fresh() {
        let cache = QueryCache::new();
        cache.invalidate(QueryKey::MediaList);
        let started_at = cache.generation(QueryKey::MediaList);

        assert!(cache.insert_fetched(QueryKey::MediaList, vec![2], started_at));
        assert_eq!(cache.get(QueryKey::MediaList), Some(vec![2]));
    }

    #[test]
    fn test_updated_at_tracks_inserts() {
        let cache = QueryCache::new();
        assert_eq!(cache.updated_at(QueryKey::MediaList), None);

        let before = Instant::now();
        cache.insert(QueryKey::MediaList, vec![3]);
        let updated_at = cache.updated_at(QueryKey::MediaList).unwrap();
        assert!(updated_at >= before);

        cache.invalidate(QueryKey::MediaList);
        assert_eq!(cache.updated_at(QueryKey::MediaList), Some(updated_at));
    }

    #[test]
    fn test_query_key_path() {
        assert_eq!(QueryKey::MediaList.path(), "/api/media");
    }
}
