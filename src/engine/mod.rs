//! Adaptation Facade
//!
//! `AdapterEngine` ties the hierarchy, registry, candidate resolver and
//! invocation cache together behind two calls: `register` at startup and
//! `adapt` at use sites.
//!
//! ```rust
//! use adaptmap::{Adapter, AdapterEngine, Capabilities, DeclareCapabilities, TypeHierarchy};
//! use std::sync::Arc;
//!
//! struct Animal { name: String }
//! struct Dog { animal: Animal }
//! struct Sound(String);
//!
//! struct Bark;
//! impl Adapter<Dog, Sound> for Bark {
//!     fn adapt(&self, dog: &Dog) -> Option<Sound> {
//!         Some(Sound(format!("{} says woof", dog.animal.name)))
//!     }
//! }
//! impl DeclareCapabilities for Bark {
//!     fn declare(caps: &mut Capabilities<Self>) {
//!         caps.adapts::<Dog, Sound>();
//!     }
//! }
//!
//! let hierarchy = TypeHierarchy::builder()
//!     .declare::<Dog>(|t| t.extends::<Animal>(|d| &d.animal))
//!     .build()?;
//! let engine = AdapterEngine::new(hierarchy);
//! engine.register(Arc::new(Bark))?;
//!
//! let rex = Dog { animal: Animal { name: "Rex".into() } };
//! let sound = engine.adapt::<Sound>(&rex)?.unwrap();
//! assert_eq!(sound.0, "Rex says woof");
//!
//! let animal = engine.adapt::<Animal>(&rex)?.unwrap();
//! assert!(animal.is_same());
//! # Ok::<(), adaptmap::AdaptError>(())
//! ```

mod adapted;
mod stats;

pub use adapted::Adapted;
pub use stats::{CandidateInfo, EngineStats};

use rayon::prelude::*;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{info, trace};

use crate::candidates::{Candidate, CandidateResolver};
use crate::config::EngineConfig;
use crate::errors::{AdaptError, Result};
use crate::hierarchy::TypeHierarchy;
use crate::invoker::InvocationCache;
use crate::observability::profiling::{self, spans};
use crate::registry::{
    Adapter, AdapterEntry, AdapterInfo, AdapterRegistry, DeclareCapabilities, TryAdapter,
};
use crate::time_span;
use crate::types::{TypeKey, Viewable};

pub struct AdapterEngine {
    config: EngineConfig,
    hierarchy: TypeHierarchy,
    registry: AdapterRegistry,
    candidates: CandidateResolver,
    invokers: InvocationCache,
}

impl AdapterEngine {
    pub fn new(hierarchy: TypeHierarchy) -> Self {
        Self::with_config(hierarchy, EngineConfig::default())
    }

    pub fn with_config(hierarchy: TypeHierarchy, config: EngineConfig) -> Self {
        if config.profiling {
            profiling::enable_profiling();
        }
        info!(
            declared_types = hierarchy.declared_count(),
            inert_adapters = ?config.inert_adapters,
            cache_candidates = config.cache_candidates,
            "adapter engine ready"
        );

        Self {
            registry: AdapterRegistry::new(config.inert_adapters),
            candidates: CandidateResolver::new(config.cache_candidates),
            invokers: InvocationCache::new(),
            hierarchy,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Register every capability pair `A` declares
    ///
    /// Passing `None` fails with `InvalidArgument`. Once this returns, every
    /// later `adapt` call sees the new entries.
    pub fn register<A>(&self, adapter: impl Into<Option<Arc<A>>>) -> Result<usize>
    where
        A: DeclareCapabilities + Send + Sync + 'static,
    {
        let added = self.registry.register(adapter)?;
        self.candidates.invalidate();
        Ok(added)
    }

    /// Register `adapter` for the single pair `(F, T)`
    pub fn register_adapter<F, T, A>(&self, adapter: Arc<A>) -> Result<()>
    where
        F: Viewable + ?Sized,
        T: 'static,
        A: Adapter<F, T> + Send + Sync + 'static,
    {
        self.registry.register_adapter::<F, T, A>(adapter)?;
        self.candidates.invalidate();
        Ok(())
    }

    /// Register a fallible `adapter` for the single pair `(F, T)`
    pub fn register_fallible<F, T, A>(&self, adapter: Arc<A>) -> Result<()>
    where
        F: Viewable + ?Sized,
        T: 'static,
        A: TryAdapter<F, T> + Send + Sync + 'static,
    {
        self.registry.register_fallible::<F, T, A>(adapter)?;
        self.candidates.invalidate();
        Ok(())
    }

    /// Adapt `instance` to `T`
    ///
    /// Returns the instance itself when its type already is, or declares, `T`.
    /// Otherwise candidates are tried nearest first and the first adapter
    /// returning a value wins. `Ok(None)` means no candidate produced one.
    /// Errors raised by a fallible adapter stop the search and propagate.
    pub fn adapt<'a, T: 'static>(&self, instance: &'a dyn Any) -> Result<Option<Adapted<'a, T>>> {
        time_span!(spans::ADAPT);

        if let Some(same) = self.view_as::<T>(instance) {
            trace!(target_type = std::any::type_name::<T>(), "identity adaptation");
            return Ok(Some(Adapted::Same(same)));
        }

        let target = TypeKey::of::<T>();
        let candidates = self.resolve_candidates(instance.type_id(), target);

        for candidate in candidates.iter() {
            if let Some(value) = self.invoke::<T>(candidate, instance)? {
                return Ok(Some(Adapted::Converted(value)));
            }
            trace!(
                adapter = candidate.entry.adapter,
                distance = candidate.distance,
                "adapter declined, trying next candidate"
            );
        }

        Ok(None)
    }

    /// `adapt` for a possibly absent instance; absence adapts to nothing
    pub fn adapt_optional<'a, T: 'static>(
        &self,
        instance: Option<&'a dyn Any>,
    ) -> Result<Option<Adapted<'a, T>>> {
        match instance {
            Some(instance) => self.adapt(instance),
            None => Ok(None),
        }
    }

    /// Whether `adapt::<T>` could succeed without running any adapter code
    ///
    /// True for the identity case or when at least one candidate exists.
    pub fn can_adapt<T: 'static>(&self, instance: &dyn Any) -> bool {
        self.view_as::<T>(instance).is_some()
            || !self
                .resolve_candidates(instance.type_id(), TypeKey::of::<T>())
                .is_empty()
    }

    /// Ranked candidates for adapting a `source` value to `T`
    pub fn candidates<T: 'static>(&self, source: TypeId) -> Vec<CandidateInfo> {
        self.resolve_candidates(source, TypeKey::of::<T>())
            .iter()
            .map(|c| CandidateInfo {
                adapter: c.entry.adapter,
                from: c.entry.from,
                to: c.entry.to,
                distance: c.distance,
                sequence: c.entry.sequence,
            })
            .collect()
    }

    /// Every registered pair, in registration order
    pub fn registered(&self) -> Vec<AdapterInfo> {
        self.registry.infos()
    }

    pub fn stats(&self) -> EngineStats {
        let snapshot = self.registry.snapshot();
        EngineStats {
            hierarchy: self.hierarchy.cache_stats(),
            candidate_hits: self.candidates.hits(),
            candidate_misses: self.candidates.misses(),
            cached_candidate_lists: self.candidates.len(),
            invoker_compilations: self.invokers.compilations(),
            invokers: self.invokers.len(),
            adapters: snapshot.entries.len(),
            generation: snapshot.generation,
        }
    }

    /// Resolve candidate lists and their invokers ahead of first use
    ///
    /// Each pair is a source `TypeId` and a target key. Returns how many
    /// candidates the lists hold in total.
    pub fn warm_up(&self, pairs: &[(TypeId, TypeKey)]) -> usize {
        pairs
            .par_iter()
            .map(|&(source, target)| {
                let candidates = self.resolve_candidates(source, target);
                for candidate in candidates.iter() {
                    self.invokers.get(&candidate.entry.shape);
                }
                candidates.len()
            })
            .sum()
    }

    fn view_as<'a, T: 'static>(&self, instance: &'a dyn Any) -> Option<&'a T> {
        if let Some(direct) = instance.downcast_ref::<T>() {
            return Some(direct);
        }

        let target = TypeId::of::<T>();
        let ancestors = self.hierarchy.resolve(instance.type_id());
        let ancestor = ancestors.iter().find(|a| a.key.id() == target)?;
        ancestor.projection.apply(instance)?.downcast_ref::<T>()
    }

    fn resolve_candidates(&self, source: TypeId, target: TypeKey) -> Arc<[Candidate]> {
        let snapshot = self.registry.snapshot();
        self.candidates
            .resolve(&self.hierarchy, &snapshot, source, target)
    }

    fn invoke<T: 'static>(&self, candidate: &Candidate, instance: &dyn Any) -> Result<Option<T>> {
        let entry: &AdapterEntry = &candidate.entry;
        let source = candidate.projection.apply(instance).ok_or_else(|| {
            AdaptError::invalid_shape(entry.from, entry.to, "source does not project to From")
        })?;

        let invoker = self.invokers.get(&entry.shape);
        let mut slot: Option<T> = None;
        invoker(entry, source, &mut slot)?;
        Ok(slot)
    }
}

impl Default for AdapterEngine {
    fn default() -> Self {
        Self::new(TypeHierarchy::empty())
    }
}

impl std::fmt::Debug for AdapterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterEngine")
            .field("hierarchy", &self.hierarchy)
            .field("adapters", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
