//! Pure hierarchy resolution
//!
//! Breadth-first ancestor computation and assignability checks over a set of
//! declared type nodes. No caching or side effects.

use std::any::TypeId;
use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{HierarchyEntry, TypeNode};
use crate::types::{Projection, TypeKey};

/// Ancestors of `concrete`, nearest first
///
/// The first visit of a type is kept, which BFS guarantees is the minimum
/// distance. The universal root is appended last, one step beyond the
/// farthest declared ancestor.
pub fn breadth_first(concrete: TypeKey, nodes: &HashMap<TypeId, TypeNode>) -> Vec<HierarchyEntry> {
    let mut entries = vec![HierarchyEntry {
        key: concrete,
        distance: 0,
        projection: Projection::identity(),
    }];
    if concrete.is_root() {
        return entries;
    }

    let mut seen: HashSet<TypeId> = HashSet::from([concrete.id()]);
    let mut queue: VecDeque<usize> = VecDeque::from([0]);

    while let Some(index) = queue.pop_front() {
        let current = entries[index].clone();
        let Some(node) = nodes.get(&current.key.id()) else {
            continue;
        };

        for supertype in node.visit_order() {
            if !seen.insert(supertype.key.id()) {
                continue;
            }
            entries.push(HierarchyEntry {
                key: supertype.key,
                distance: current.distance + 1,
                projection: current.projection.then(supertype.edge.clone()),
            });
            queue.push_back(entries.len() - 1);
        }
    }

    let farthest = entries.last().map_or(0, |e| e.distance);
    entries.push(HierarchyEntry {
        key: TypeKey::root(),
        distance: farthest + 1,
        projection: Projection::identity(),
    });

    entries
}

/// Whether a value of type `concrete` can be viewed as `ancestor`
///
/// Walks declared edges directly rather than trusting a cached list.
pub fn is_assignable(ancestor: TypeId, concrete: TypeId, nodes: &HashMap<TypeId, TypeNode>) -> bool {
    if ancestor == concrete || ancestor == TypeKey::root().id() {
        return true;
    }

    let mut visited: HashSet<TypeId> = HashSet::new();
    let mut stack = vec![concrete];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = nodes.get(&id) else {
            continue;
        };
        for supertype in &node.supertypes {
            if supertype.key.id() == ancestor {
                return true;
            }
            stack.push(supertype.key.id());
        }
    }

    false
}
