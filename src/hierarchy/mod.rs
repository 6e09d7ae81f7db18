//! Type Hierarchy Resolver
//!
//! Rust has no runtime inheritance, so participating types declare their
//! direct supertypes up front, each with a borrow projection:
//!
//! ```rust
//! use adaptmap::hierarchy::TypeHierarchy;
//!
//! struct Animal { name: String }
//! struct Dog { animal: Animal }
//!
//! let hierarchy = TypeHierarchy::builder()
//!     .declare::<Animal>(|t| t)
//!     .declare::<Dog>(|t| t.extends::<Animal>(|dog| &dog.animal))
//!     .build()
//!     .unwrap();
//!
//! let ancestors = hierarchy.resolve_type::<Dog>();
//! assert_eq!(ancestors[1].distance, 1);
//! ```
//!
//! A built hierarchy is immutable, so resolved ancestor lists are cached for
//! the lifetime of the hierarchy and never invalidated.

pub mod resolution;
pub mod types;

pub use types::{HierarchyEntry, Supertype, SupertypeKind, TypeNode};

use dashmap::DashMap;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

use crate::errors::{AdaptError, Result};
use crate::observability::profiling::spans;
use crate::time_span;
use crate::types::projection::Edge;
use crate::types::TypeKey;

/// Declared type graph plus a memo of resolved ancestor lists
pub struct TypeHierarchy {
    nodes: HashMap<TypeId, TypeNode>,
    cache: DashMap<TypeId, Arc<[HierarchyEntry]>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters of the ancestor cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl TypeHierarchy {
    pub fn builder() -> TypeHierarchyBuilder {
        TypeHierarchyBuilder::default()
    }

    /// A hierarchy with no declarations; every type resolves to itself and
    /// the root
    pub fn empty() -> Self {
        Self::from_nodes(HashMap::new())
    }

    fn from_nodes(nodes: HashMap<TypeId, TypeNode>) -> Self {
        Self {
            nodes,
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Ancestors of `concrete` ordered by ascending distance
    pub fn resolve(&self, concrete: TypeId) -> Arc<[HierarchyEntry]> {
        if let Some(cached) = self.cache.get(&concrete) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed: Arc<[HierarchyEntry]> = {
            time_span!(spans::HIERARCHY_RESOLVE);
            resolution::breadth_first(self.key_of(concrete), &self.nodes).into()
        };
        trace!(
            concrete = %self.key_of(concrete),
            ancestors = computed.len(),
            "resolved type hierarchy"
        );

        // A racing thread may have published first; keep its list
        self.cache.entry(concrete).or_insert(computed).clone()
    }

    pub fn resolve_type<T: Any>(&self) -> Arc<[HierarchyEntry]> {
        self.resolve(TypeId::of::<T>())
    }

    /// Whether a `concrete` value can be viewed as `ancestor`
    pub fn is_assignable(&self, ancestor: TypeId, concrete: TypeId) -> bool {
        resolution::is_assignable(ancestor, concrete, &self.nodes)
    }

    /// The declared key for `id`, or a nameless key for undeclared types
    pub fn key_of(&self, id: TypeId) -> TypeKey {
        self.nodes
            .get(&id)
            .map_or_else(|| TypeKey::undeclared(id), |node| node.key)
    }

    pub fn is_declared(&self, id: TypeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(&id)
    }

    pub fn declared_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cache_stats(&self) -> HierarchyCacheStats {
        HierarchyCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for TypeHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHierarchy")
            .field("declared", &self.nodes.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}

/// Collects declarations; validation happens in `build`
#[derive(Default)]
pub struct TypeHierarchyBuilder {
    nodes: Vec<TypeNode>,
}

impl TypeHierarchyBuilder {
    /// Declare `T` and its direct supertypes
    pub fn declare<T: Any>(
        mut self,
        declare: impl FnOnce(TypeDeclaration<T>) -> TypeDeclaration<T>,
    ) -> Self {
        let declaration = declare(TypeDeclaration::new());
        self.nodes.push(TypeNode {
            key: TypeKey::of::<T>(),
            supertypes: declaration.supertypes,
        });
        self
    }

    /// Validate and freeze the declarations
    ///
    /// Fails with `InvalidArgument` when a type is declared twice, has more
    /// than one base, lists itself, or lists the same supertype twice.
    pub fn build(self) -> Result<TypeHierarchy> {
        let mut problems = Vec::new();
        let mut nodes: HashMap<TypeId, TypeNode> = HashMap::with_capacity(self.nodes.len());

        for node in self.nodes {
            problems.extend(validate_node(&node));
            if nodes.contains_key(&node.key.id()) {
                problems.push(format!("{} is declared more than once", node.key));
                continue;
            }
            nodes.insert(node.key.id(), node);
        }

        if !problems.is_empty() {
            return Err(AdaptError::invalid_argument(format!(
                "invalid type hierarchy: {}",
                problems.join("; ")
            )));
        }

        Ok(TypeHierarchy::from_nodes(nodes))
    }
}

fn validate_node(node: &TypeNode) -> Vec<String> {
    let mut problems = Vec::new();

    let bases = node
        .supertypes
        .iter()
        .filter(|s| s.kind == SupertypeKind::Base)
        .count();
    if bases > 1 {
        problems.push(format!("{} extends {} base types", node.key, bases));
    }

    for (i, supertype) in node.supertypes.iter().enumerate() {
        if supertype.key == node.key {
            problems.push(format!("{} lists itself as a supertype", node.key));
        }
        if node.supertypes[..i].iter().any(|s| s.key == supertype.key) {
            problems.push(format!("{} lists {} twice", node.key, supertype.key));
        }
    }

    problems
}

/// Direct supertypes of one declared type
pub struct TypeDeclaration<T> {
    supertypes: Vec<Supertype>,
    _type: PhantomData<fn(&T)>,
}

impl<T: Any> TypeDeclaration<T> {
    fn new() -> Self {
        Self {
            supertypes: Vec::new(),
            _type: PhantomData,
        }
    }

    /// `T` can be viewed as the interface `I`
    pub fn implements<I: Any>(mut self, project: fn(&T) -> &I) -> Self {
        self.supertypes.push(Supertype {
            key: TypeKey::of::<I>(),
            kind: SupertypeKind::Interface,
            edge: Arc::new(Edge::new(project)),
        });
        self
    }

    /// `T` generalizes to the base `B`
    pub fn extends<B: Any>(mut self, project: fn(&T) -> &B) -> Self {
        self.supertypes.push(Supertype {
            key: TypeKey::of::<B>(),
            kind: SupertypeKind::Base,
            edge: Arc::new(Edge::new(project)),
        });
        self
    }
}
