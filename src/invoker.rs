//! Invocation Cache
//!
//! Each `(From, To)` pair gets one monomorphized thunk that recovers the
//! typed converter from an entry's erased handle, views the source value as
//! `From` and writes the result into a caller-owned `Option<To>` slot. The
//! thunk depends only on the pair, so every adapter declaring that pair
//! shares it.
//!
//! A thunk that meets an entry, source or slot of another pair reports
//! `AdaptError::InvalidAdapterShape`.

use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::errors::{AdaptError, Result};
use crate::observability::profiling::spans;
use crate::registry::capabilities::Convert;
use crate::registry::AdapterEntry;
use crate::time_span;
use crate::types::{TypeKey, Viewable};

/// Calls one entry's converter on an already-projected source value
///
/// `out` must be an `Option<To>` for the entry's pair. Returns whether the
/// adapter produced a value.
pub(crate) type Invoker = fn(&AdapterEntry, &dyn Any, &mut dyn Any) -> Result<bool>;

/// The `(From, To)` signature of a capability pair and how to build its thunk
#[derive(Clone, Copy)]
pub(crate) struct AdapterShape {
    pub(crate) from: TypeKey,
    pub(crate) to: TypeKey,
    build: fn() -> Invoker,
}

impl AdapterShape {
    pub(crate) fn of<F: Viewable + ?Sized, T: 'static>() -> Self {
        Self {
            from: TypeKey::of::<F>(),
            to: TypeKey::of::<T>(),
            build: build_invoker::<F, T>,
        }
    }

    pub(crate) fn key(&self) -> (TypeId, TypeId) {
        (self.from.id(), self.to.id())
    }
}

fn build_invoker<F: Viewable + ?Sized, T: 'static>() -> Invoker {
    invoke::<F, T>
}

fn invoke<F: Viewable + ?Sized, T: 'static>(
    entry: &AdapterEntry,
    source: &dyn Any,
    out: &mut dyn Any,
) -> Result<bool> {
    let converter = entry
        .converter
        .downcast_ref::<std::sync::Arc<dyn Convert<F, T>>>()
        .ok_or_else(|| {
            AdaptError::invalid_shape(entry.from, entry.to, "adapter handle has another pair")
        })?;
    let from = F::view(source).ok_or_else(|| {
        AdaptError::invalid_shape(entry.from, entry.to, "source is not a view of From")
    })?;
    let slot = out.downcast_mut::<Option<T>>().ok_or_else(|| {
        AdaptError::invalid_shape(entry.from, entry.to, "output slot is not Option<To>")
    })?;

    *slot = converter
        .convert(from)
        .map_err(|source| AdaptError::adapter(entry.adapter, source))?;
    Ok(slot.is_some())
}

/// Memoized thunks keyed by `(From, To)`; never invalidated
#[derive(Default)]
pub(crate) struct InvocationCache {
    invokers: DashMap<(TypeId, TypeId), Invoker>,
    compilations: AtomicU64,
}

impl InvocationCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The thunk for `shape`, built on first request
    ///
    /// The entry API holds the shard lock while building, so each pair is
    /// built at most once.
    pub(crate) fn get(&self, shape: &AdapterShape) -> Invoker {
        if let Some(invoker) = self.invokers.get(&shape.key()) {
            return *invoker;
        }

        *self.invokers.entry(shape.key()).or_insert_with(|| {
            time_span!(spans::INVOKER_COMPILE);
            self.compilations.fetch_add(1, Ordering::Relaxed);
            debug!(from = %shape.from, to = %shape.to, "compiled invoker");
            (shape.build)()
        })
    }

    pub(crate) fn compilations(&self) -> u64 {
        self.compilations.load(Ordering::Relaxed)
    }

    pub(crate) fn len(&self) -> usize {
        self.invokers.len()
    }
}
