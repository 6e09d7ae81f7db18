//! Pure candidate ranking
//!
//! Joins registry entries against a resolved hierarchy. No caching, no
//! locking; the resolver wraps this with its generation-checked cache.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::hierarchy::HierarchyEntry;
use crate::registry::AdapterEntry;
use crate::types::Projection;

/// An adapter entry eligible for one `(source, target)` request
#[derive(Debug, Clone)]
pub struct Candidate {
    pub entry: Arc<AdapterEntry>,
    /// Hierarchy distance from the source type to the entry's `From`
    pub distance: u32,
    /// How to view a source value as the entry's `From`
    pub projection: Projection,
}

/// Entries targeting `target` whose `From` is an ancestor of the source,
/// nearest first
///
/// `entries` must be in registration order; the sort is stable, so equal
/// distances keep that order. `assignable` re-checks each surviving `From`
/// against the source type.
pub fn rank_candidates(
    entries: &[Arc<AdapterEntry>],
    target: TypeId,
    ancestors: &[HierarchyEntry],
    assignable: impl Fn(TypeId) -> bool,
) -> Vec<Candidate> {
    let positions: HashMap<TypeId, &HierarchyEntry> =
        ancestors.iter().map(|a| (a.key.id(), a)).collect();

    let mut candidates: Vec<Candidate> = entries
        .iter()
        .filter(|entry| entry.to.id() == target)
        .filter_map(|entry| {
            let position = positions.get(&entry.from.id())?;
            Some(Candidate {
                entry: entry.clone(),
                distance: position.distance,
                projection: position.projection.clone(),
            })
        })
        .filter(|candidate| assignable(candidate.entry.from.id()))
        .collect();

    candidates.sort_by_key(|c| c.distance);
    candidates
}
