//! Candidate Resolver
//!
//! Ranked candidate lists are memoized per `(source, target)` pair. Each
//! cached list remembers the registry generation it was computed from and is
//! only served while that generation is current, so a list computed before a
//! registration can never be returned after it, even if it was published
//! after the registration cleared the cache.

pub mod ranking;

pub use ranking::{rank_candidates, Candidate};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

use crate::hierarchy::TypeHierarchy;
use crate::observability::profiling::spans;
use crate::registry::RegistrySnapshot;
use crate::time_span;
use crate::types::TypeKey;

#[derive(Clone)]
struct CachedCandidates {
    generation: u64,
    candidates: Arc<[Candidate]>,
}

pub struct CandidateResolver {
    cache: DashMap<(TypeId, TypeId), CachedCandidates>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CandidateResolver {
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: DashMap::new(),
            enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Ranked candidates for adapting a `source` value to `target`
    pub fn resolve(
        &self,
        hierarchy: &TypeHierarchy,
        snapshot: &RegistrySnapshot,
        source: TypeId,
        target: TypeKey,
    ) -> Arc<[Candidate]> {
        let key = (source, target.id());

        if self.enabled {
            if let Some(cached) = self.cache.get(&key) {
                if cached.generation == snapshot.generation {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return cached.candidates.clone();
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let candidates: Arc<[Candidate]> = {
            time_span!(spans::CANDIDATES_RESOLVE, parent: spans::ADAPT);
            let ancestors = hierarchy.resolve(source);
            rank_candidates(&snapshot.entries, target.id(), &ancestors, |from| {
                hierarchy.is_assignable(from, source)
            })
            .into()
        };
        trace!(
            source = %hierarchy.key_of(source),
            target = %target,
            generation = snapshot.generation,
            candidates = candidates.len(),
            "resolved adapter candidates"
        );

        if self.enabled {
            self.publish(key, snapshot.generation, candidates.clone());
        }
        candidates
    }

    /// Store a list unless a newer generation got there first
    fn publish(&self, key: (TypeId, TypeId), generation: u64, candidates: Arc<[Candidate]>) {
        let fresh = CachedCandidates {
            generation,
            candidates,
        };
        match self.cache.entry(key) {
            Entry::Occupied(mut slot) => {
                if slot.get().generation < generation {
                    slot.insert(fresh);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(fresh);
            }
        }
    }

    /// Drop every cached list
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
