//! Serializable engine snapshots

use serde::Serialize;

use crate::hierarchy::HierarchyCacheStats;
use crate::types::TypeKey;

/// Counters across the engine's caches at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub hierarchy: HierarchyCacheStats,
    pub candidate_hits: u64,
    pub candidate_misses: u64,
    pub cached_candidate_lists: usize,
    pub invoker_compilations: u64,
    pub invokers: usize,
    pub adapters: usize,
    pub generation: u64,
}

impl EngineStats {
    /// Share of candidate lookups served from cache, in `[0, 1]`
    pub fn candidate_hit_rate(&self) -> f64 {
        let total = self.candidate_hits + self.candidate_misses;
        if total == 0 {
            0.0
        } else {
            self.candidate_hits as f64 / total as f64
        }
    }
}

/// One ranked candidate, as reported by `AdapterEngine::candidates`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateInfo {
    pub adapter: &'static str,
    pub from: TypeKey,
    pub to: TypeKey,
    pub distance: u32,
    pub sequence: u64,
}
