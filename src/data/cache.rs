//! Bounded, process-wide memo of PDF extraction results.
//!
//! One mutex guards the LRU map and the in-flight table. It is only held for
//! bookkeeping, never while a document is being extracted, so callers working
//! on different documents do not wait on each other. Callers asking for a
//! document that is already being extracted wait for that extraction instead
//! of starting a second one. Failures are handed to those waiters but never
//! stored.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::debug;
use lru::LruCache;

use super::document::DocumentId;
use super::model::Table;
use crate::error::{PipelineError, Result};

/// Default number of documents kept.
pub const DEFAULT_CAPACITY: usize = 10;

pub type CachedTables = Arc<Vec<Table>>;

type FlightResult = Result<CachedTables>;

#[derive(Default)]
struct Flight {
    result: Mutex<Option<FlightResult>>,
    ready: Condvar,
}

impl Flight {
    fn publish(&self, result: FlightResult) {
        *lock(&self.result) = Some(result);
        self.ready.notify_all();
    }

    fn wait(&self) -> FlightResult {
        let mut slot = lock(&self.result);
        loop {
            if let Some(result) = slot.as_ref() {
                return result.clone();
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

struct CacheState {
    entries: LruCache<DocumentId, CachedTables>,
    in_flight: HashMap<DocumentId, Arc<Flight>>,
}

/// Hit/miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct ExtractionCache {
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ExtractionCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl ExtractionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        lock(&self.state)
    }

    pub fn capacity(&self) -> usize {
        self.state().entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.state().entries.contains(id)
    }

    /// Look up a document, marking it most recently used.
    pub fn get(&self, id: &DocumentId) -> Option<CachedTables> {
        self.state().entries.get(id).cloned()
    }

    /// Store tables for a document, evicting the least recently used entry
    /// when full. Returns the evicted identity, if any.
    pub fn insert(&self, id: DocumentId, tables: CachedTables) -> Option<DocumentId> {
        let evicted = self
            .state()
            .entries
            .push(id, tables)
            .map(|(old, _)| old)
            .filter(|old| *old != id);
        if let Some(old) = evicted {
            debug!("extraction cache evicted {old}");
        }
        evicted
    }

    /// Drop one entry. Returns whether it was present.
    pub fn evict(&self, id: &DocumentId) -> bool {
        self.state().entries.pop(id).is_some()
    }

    pub fn clear(&self) {
        self.state().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Return the cached tables for `id`, or run `extract` once and cache a
    /// successful result.
    ///
    /// Concurrent callers with the same `id` share one run of `extract`.
    pub fn get_or_extract<F>(&self, id: DocumentId, extract: F) -> Result<CachedTables>
    where
        F: FnOnce() -> Result<Vec<Table>>,
    {
        let flight = {
            let mut state = self.state();
            if let Some(tables) = state.entries.get(&id) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("extraction cache hit for {id}");
                return Ok(Arc::clone(tables));
            }
            self.misses.fetch_add(1, Ordering::Relaxed);

            if let Some(flight) = state.in_flight.get(&id) {
                let flight = Arc::clone(flight);
                drop(state);
                debug!("waiting on in-flight extraction of {id}");
                return flight.wait();
            }

            let flight = Arc::new(Flight::default());
            state.in_flight.insert(id, Arc::clone(&flight));
            flight
        };

        let mut guard = FlightGuard {
            cache: self,
            id,
            flight,
            done: false,
        };
        let result = extract().map(Arc::new);
        guard.finish(result.clone());
        result
    }
}

/// Completes a flight even if the extraction closure unwinds, so waiters
/// never block forever.
struct FlightGuard<'a> {
    cache: &'a ExtractionCache,
    id: DocumentId,
    flight: Arc<Flight>,
    done: bool,
}

impl FlightGuard<'_> {
    fn finish(&mut self, result: FlightResult) {
        {
            let mut state = self.cache.state();
            state.in_flight.remove(&self.id);
            if let Ok(tables) = &result {
                if let Some((old, _)) = state.entries.push(self.id, Arc::clone(tables)) {
                    if old != self.id {
                        debug!("extraction cache evicted {old}");
                    }
                }
            }
        }
        self.flight.publish(result);
        self.done = true;
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.finish(Err(PipelineError::ExtractionFailure(
                "extraction aborted unexpectedly".to_string(),
            )));
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // the guarded data stays consistent even if a holder panicked
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
