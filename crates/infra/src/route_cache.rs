//! Rendered-route cache.
//!
//! Read handlers store the body they rendered under the request path. Write
//! actions call [`RouteCache::revalidate_path`] so the next read recomputes it.
//!
//! Every revalidation advances a generation counter. A reader captures the
//! generation before it loads data and hands it back to [`RouteCache::put`];
//! a body rendered before a revalidation is dropped instead of stored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

/// Counters exposed for tests and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    /// Puts dropped because a revalidation happened after the read began.
    pub stale_puts: u64,
}

pub trait RouteCache: Send + Sync {
    fn get(&self, path: &str) -> Option<String>;
    /// Current generation. Capture it before loading the data a body renders.
    fn generation(&self) -> u64;
    /// Store `body` rendered from data read at `generation`. Returns `false`
    /// when the cache has been revalidated since.
    fn put(&self, path: &str, body: String, generation: u64) -> bool;
    /// Drop the cached body for exactly `path`.
    fn revalidate_path(&self, path: &str);
    fn stats(&self) -> CacheStats;
}

impl<S> RouteCache for Arc<S>
where
    S: RouteCache + ?Sized,
{
    fn get(&self, path: &str) -> Option<String> {
        (**self).get(path)
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }

    fn put(&self, path: &str, body: String, generation: u64) -> bool {
        (**self).put(path, body, generation)
    }

    fn revalidate_path(&self, path: &str) {
        (**self).revalidate_path(path)
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}

#[derive(Debug, Default)]
struct Entries {
    bodies: HashMap<String, String>,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryRouteCache {
    inner: RwLock<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    stale_puts: AtomicU64,
}

impl InMemoryRouteCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RouteCache for InMemoryRouteCache {
    fn get(&self, path: &str) -> Option<String> {
        let cached = self
            .inner
            .read()
            .ok()
            .and_then(|entries| entries.bodies.get(path).cloned());

        match cached {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        cached
    }

    fn generation(&self) -> u64 {
        // A poisoned lock never matches, so nothing is stored.
        self.inner
            .read()
            .map(|entries| entries.generation)
            .unwrap_or(u64::MAX)
    }

    fn put(&self, path: &str, body: String, generation: u64) -> bool {
        let Ok(mut entries) = self.inner.write() else {
            return false;
        };
        if entries.generation != generation {
            self.stale_puts.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                path,
                read_at = generation,
                current = entries.generation,
                "dropped stale render"
            );
            return false;
        }
        entries.bodies.insert(path.to_string(), body);
        true
    }

    fn revalidate_path(&self, path: &str) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        let removed = match self.inner.write() {
            Ok(mut entries) => {
                entries.generation = entries.generation.wrapping_add(1);
                entries.bodies.remove(path).is_some()
            }
            Err(_) => false,
        };
        tracing::debug!(path, removed, "revalidated route");
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            stale_puts: self.stale_puts.load(Ordering::Relaxed),
        }
    }
}
