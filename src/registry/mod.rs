//! Adapter Registry
//!
//! Append-only store of capability entries. Writers swap in a new entry
//! vector under a short write lock and bump the generation in the same
//! critical section; readers clone the current `Arc` and never block on
//! adaptation work.

pub mod capabilities;
pub mod types;

pub use capabilities::{Adapter, Capabilities, DeclareCapabilities, TryAdapter};
pub use types::{AdapterEntry, AdapterInfo, RegistrySnapshot};

use parking_lot::RwLock;
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::InertAdapterPolicy;
use crate::errors::{AdaptError, Result};
use crate::observability::profiling::spans;
use crate::time_span;

struct RegistryState {
    entries: Arc<Vec<Arc<AdapterEntry>>>,
    generation: u64,
}

pub struct AdapterRegistry {
    state: RwLock<RegistryState>,
    inert_policy: InertAdapterPolicy,
}

impl AdapterRegistry {
    pub fn new(inert_policy: InertAdapterPolicy) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                entries: Arc::new(Vec::new()),
                generation: 0,
            }),
            inert_policy,
        }
    }

    /// Register every pair `A` declares
    ///
    /// Returns the number of entries added. `None` is rejected with
    /// `InvalidArgument`; an adapter declaring no pairs is handled per the
    /// inert-adapter policy.
    pub fn register<A>(&self, adapter: impl Into<Option<Arc<A>>>) -> Result<usize>
    where
        A: DeclareCapabilities + Send + Sync + 'static,
    {
        let adapter = adapter.into().ok_or_else(|| {
            AdaptError::invalid_argument(format!(
                "adapter must not be null ({})",
                type_name::<A>()
            ))
        })?;
        self.register_capabilities(adapter, Capabilities::of())
    }

    /// Register one pair for an adapter that does not declare its own
    pub fn register_adapter<F, T, A>(&self, adapter: Arc<A>) -> Result<usize>
    where
        F: crate::types::Viewable + ?Sized,
        T: 'static,
        A: Adapter<F, T> + Send + Sync + 'static,
    {
        let mut caps = Capabilities::new();
        caps.adapts::<F, T>();
        self.register_capabilities(adapter, caps)
    }

    /// Register one fallible pair for an adapter that does not declare its own
    pub fn register_fallible<F, T, A>(&self, adapter: Arc<A>) -> Result<usize>
    where
        F: crate::types::Viewable + ?Sized,
        T: 'static,
        A: TryAdapter<F, T> + Send + Sync + 'static,
    {
        let mut caps = Capabilities::new();
        caps.try_adapts::<F, T>();
        self.register_capabilities(adapter, caps)
    }

    fn register_capabilities<A>(&self, adapter: Arc<A>, caps: Capabilities<A>) -> Result<usize>
    where
        A: Send + Sync + 'static,
    {
        time_span!(spans::REGISTER);
        let name = type_name::<A>();

        if caps.is_empty() {
            match self.inert_policy {
                InertAdapterPolicy::Ignore => {}
                InertAdapterPolicy::Warn => {
                    warn!(adapter = name, "adapter declares no capability pairs");
                }
                InertAdapterPolicy::Reject => {
                    return Err(AdaptError::invalid_argument(format!(
                        "adapter {name} declares no capability pairs"
                    )));
                }
            }
        }

        let pairs = caps.into_pairs();
        let added = pairs.len();

        let mut state = self.state.write();
        let mut entries: Vec<Arc<AdapterEntry>> = state.entries.as_ref().clone();
        let first = entries.len() as u64;
        for (offset, pair) in pairs.into_iter().enumerate() {
            let entry = AdapterEntry::bind(first + offset as u64, adapter.clone(), pair);
            debug!(
                adapter = name,
                from = %entry.from,
                to = %entry.to,
                sequence = entry.sequence,
                "registered adapter pair"
            );
            entries.push(Arc::new(entry));
        }
        state.entries = Arc::new(entries);
        state.generation += 1;

        Ok(added)
    }

    /// Current entries and the generation they belong to
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        RegistrySnapshot {
            entries: state.entries.clone(),
            generation: state.generation,
        }
    }

    /// Number of completed registrations, including inert ones
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn infos(&self) -> Vec<AdapterInfo> {
        self.snapshot().entries.iter().map(|e| e.info()).collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new(InertAdapterPolicy::default())
    }
}
