//! Registry entries and their serializable summaries

use serde::Serialize;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use super::capabilities::{Capability, ErasedConverter};
use crate::invoker::AdapterShape;
use crate::types::TypeKey;

/// One registered capability pair bound to its adapter instance
///
/// Immutable once created; the registry only ever appends entries.
pub struct AdapterEntry {
    /// Registration order across the whole registry; equal-distance
    /// candidates are tried in this order
    pub sequence: u64,
    /// Type name of the adapter
    pub adapter: &'static str,
    pub from: TypeKey,
    pub to: TypeKey,
    pub fallible: bool,
    pub(crate) converter: ErasedConverter,
    pub(crate) shape: AdapterShape,
}

impl AdapterEntry {
    pub(crate) fn bind<A: 'static>(sequence: u64, adapter: Arc<A>, capability: Capability<A>) -> Self {
        Self {
            sequence,
            adapter: type_name::<A>(),
            from: capability.from(),
            to: capability.to(),
            fallible: capability.fallible,
            converter: (capability.bind)(adapter),
            shape: capability.shape,
        }
    }

    pub fn info(&self) -> AdapterInfo {
        AdapterInfo {
            sequence: self.sequence,
            adapter: self.adapter,
            from: self.from,
            to: self.to,
            fallible: self.fallible,
        }
    }
}

impl fmt::Debug for AdapterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterEntry")
            .field("sequence", &self.sequence)
            .field("adapter", &self.adapter)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("fallible", &self.fallible)
            .finish()
    }
}

/// Serializable description of a registered pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterInfo {
    pub sequence: u64,
    pub adapter: &'static str,
    pub from: TypeKey,
    pub to: TypeKey,
    pub fallible: bool,
}

/// Entries as of one registry generation
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub entries: Arc<Vec<Arc<AdapterEntry>>>,
    pub generation: u64,
}
