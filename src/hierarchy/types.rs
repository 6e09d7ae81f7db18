//! Pure data types for type hierarchies
//!
//! These types describe declared supertype edges and resolved ancestor
//! lists without any caching or locking.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::types::{Project, Projection, TypeKey};

/// How a supertype relates to its subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupertypeKind {
    /// A capability view; a type may implement any number
    Interface,
    /// The single base the type generalizes to
    Base,
}

/// A declared edge from a type to one of its direct supertypes
#[derive(Clone)]
pub struct Supertype {
    pub key: TypeKey,
    pub kind: SupertypeKind,
    pub(crate) edge: Arc<dyn Project>,
}

impl fmt::Debug for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supertype")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A declared type and its direct supertypes
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub key: TypeKey,
    pub supertypes: Vec<Supertype>,
}

impl TypeNode {
    /// The declared base, if any
    pub fn base(&self) -> Option<&Supertype> {
        self.supertypes
            .iter()
            .find(|s| s.kind == SupertypeKind::Base)
    }

    /// Direct supertypes in breadth-first visiting order: interfaces in
    /// declaration order, then the base
    pub fn visit_order(&self) -> impl Iterator<Item = &Supertype> {
        self.supertypes
            .iter()
            .filter(|s| s.kind == SupertypeKind::Interface)
            .chain(self.base())
    }
}

/// One ancestor of a concrete type
#[derive(Debug, Clone)]
pub struct HierarchyEntry {
    pub key: TypeKey,
    /// Generalization steps from the concrete type; 0 for the type itself
    pub distance: u32,
    /// How to borrow a value of the concrete type as this ancestor
    pub projection: Projection,
}
