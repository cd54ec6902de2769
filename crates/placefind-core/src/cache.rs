use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{QueryKey, QueryState};
use crate::source::PlaceSource;

type Entry = Arc<watch::Sender<QueryState>>;

/// Keyed, single-flight request cache with infinite staleness.
///
/// The first [`ensure`](QueryCache::ensure) for a key spawns one fetch and
/// stores its state; every later caller observes that same entry. Settled
/// results are kept until [`invalidate`](QueryCache::invalidate). A failed
/// key is fetched again the next time it is ensured.
///
/// Cloning is cheap and shares the underlying entries.
#[derive(Clone)]
pub struct QueryCache {
    source: Arc<dyn PlaceSource>,
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    pub fn new(source: Arc<dyn PlaceSource>) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Current state of `key`. Never triggers a fetch.
    pub fn state(&self, key: &QueryKey) -> QueryState {
        self.entries
            .lock()
            .get(key)
            .map(|tx| tx.borrow().clone())
            .unwrap_or_default()
    }

    /// Start a fetch for `key` unless one is cached or in flight.
    ///
    /// Returns `true` when a new fetch was spawned. Must be called from
    /// within a Tokio runtime.
    pub fn ensure(&self, key: &QueryKey) -> bool {
        self.ensure_entry(key).1
    }

    /// Ensure `key` and wait until its fetch settles.
    pub async fn fetch(&self, key: &QueryKey) -> QueryState {
        let (Some(entry), _) = self.ensure_entry(key) else {
            return QueryState::Idle;
        };

        let mut rx = entry.subscribe();
        match rx.wait_for(QueryState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => QueryState::Failed("query was dropped before settling".to_string()),
        }
    }

    /// Drop the cached entry for `key`, forcing the next `ensure` to refetch.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_entry(&self, key: &QueryKey) -> (Option<Entry>, bool) {
        if !key.is_enabled() {
            return (None, false);
        }

        let entry = {
            let mut entries = self.entries.lock();
            if let Some(existing) = entries.get(key) {
                let failed = matches!(*existing.borrow(), QueryState::Failed(_));
                if !failed {
                    debug!(%key, "query cache hit");
                    return (Some(Arc::clone(existing)), false);
                }
                debug!(%key, "refetching failed query");
            }
            let (tx, _) = watch::channel(QueryState::Fetching);
            let tx = Arc::new(tx);
            entries.insert(key.clone(), Arc::clone(&tx));
            tx
        };

        debug!(%key, source = self.source.name(), "query cache miss, fetching");
        let source = Arc::clone(&self.source);
        let task_entry = Arc::clone(&entry);
        let task_key = key.clone();
        tokio::spawn(async move {
            let state = match source.search(&task_key.text).await {
                Ok(result) => QueryState::Ready(Arc::new(result)),
                Err(e) => {
                    warn!(key = %task_key, error = %e, "query failed");
                    QueryState::Failed(e.to_string())
                }
            };
            task_entry.send_replace(state);
        });

        (Some(entry), true)
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("source", &self.source.name())
            .field("entries", &self.len())
            .finish()
    }
}
