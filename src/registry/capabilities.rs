//! Adapter contracts and capability declaration
//!
//! An adapter type implements `Adapter<F, T>` (or `TryAdapter<F, T>`) once
//! per conversion it supports and lists those pairs in `DeclareCapabilities`.
//! Each declared pair becomes one registry entry.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::invoker::AdapterShape;
use crate::types::{TypeKey, Viewable};

/// Conversion from a view of `F` to a new `T`
///
/// Returning `None` means "cannot adapt this particular value"; the engine
/// then tries the next candidate.
pub trait Adapter<F: ?Sized, T> {
    fn adapt(&self, from: &F) -> Option<T>;
}

/// Conversion that may fail outright
///
/// `Ok(None)` behaves like `Adapter` returning `None`. `Err` stops the
/// adaptation and reaches the caller as `AdaptError::Adapter`.
pub trait TryAdapter<F: ?Sized, T> {
    fn try_adapt(&self, from: &F) -> anyhow::Result<Option<T>>;
}

/// Lists the capability pairs of an adapter type
///
/// ```rust
/// use adaptmap::{Adapter, Capabilities, DeclareCapabilities};
///
/// struct Celsius(f64);
/// struct Fahrenheit(f64);
/// struct Thermometer;
///
/// impl Adapter<Celsius, Fahrenheit> for Thermometer {
///     fn adapt(&self, from: &Celsius) -> Option<Fahrenheit> {
///         Some(Fahrenheit(from.0 * 9.0 / 5.0 + 32.0))
///     }
/// }
///
/// impl DeclareCapabilities for Thermometer {
///     fn declare(caps: &mut Capabilities<Self>) {
///         caps.adapts::<Celsius, Fahrenheit>();
///     }
/// }
/// ```
pub trait DeclareCapabilities: Sized {
    fn declare(caps: &mut Capabilities<Self>);
}

/// Uniform conversion interface behind both adapter traits
pub(crate) trait Convert<F: ?Sized, T>: Send + Sync {
    fn convert(&self, from: &F) -> anyhow::Result<Option<T>>;
}

struct Infallible<A>(Arc<A>);

impl<F: ?Sized, T, A> Convert<F, T> for Infallible<A>
where
    A: Adapter<F, T> + Send + Sync,
{
    fn convert(&self, from: &F) -> anyhow::Result<Option<T>> {
        Ok(self.0.adapt(from))
    }
}

struct Fallible<A>(Arc<A>);

impl<F: ?Sized, T, A> Convert<F, T> for Fallible<A>
where
    A: TryAdapter<F, T> + Send + Sync,
{
    fn convert(&self, from: &F) -> anyhow::Result<Option<T>> {
        self.0.try_adapt(from)
    }
}

/// Erased converter; always an `Arc<dyn Convert<F, T>>` for the pair's types
pub(crate) type ErasedConverter = Arc<dyn Any + Send + Sync>;

fn bind_infallible<F, T, A>(adapter: Arc<A>) -> ErasedConverter
where
    F: ?Sized + 'static,
    T: 'static,
    A: Adapter<F, T> + Send + Sync + 'static,
{
    let converter: Arc<dyn Convert<F, T>> = Arc::new(Infallible(adapter));
    Arc::new(converter)
}

fn bind_fallible<F, T, A>(adapter: Arc<A>) -> ErasedConverter
where
    F: ?Sized + 'static,
    T: 'static,
    A: TryAdapter<F, T> + Send + Sync + 'static,
{
    let converter: Arc<dyn Convert<F, T>> = Arc::new(Fallible(adapter));
    Arc::new(converter)
}

/// One declared pair, not yet bound to an adapter instance
pub(crate) struct Capability<A> {
    pub(crate) shape: AdapterShape,
    pub(crate) fallible: bool,
    pub(crate) bind: fn(Arc<A>) -> ErasedConverter,
}

impl<A> Capability<A> {
    pub(crate) fn from(&self) -> TypeKey {
        self.shape.from
    }

    pub(crate) fn to(&self) -> TypeKey {
        self.shape.to
    }
}

/// Collector passed to `DeclareCapabilities::declare`
pub struct Capabilities<A> {
    pairs: Vec<Capability<A>>,
    _adapter: PhantomData<fn(A)>,
}

impl<A: Send + Sync + 'static> Capabilities<A> {
    pub(crate) fn new() -> Self {
        Self {
            pairs: Vec::new(),
            _adapter: PhantomData,
        }
    }

    /// Collect the pairs `A` declares
    pub(crate) fn of() -> Self
    where
        A: DeclareCapabilities,
    {
        let mut caps = Self::new();
        A::declare(&mut caps);
        caps
    }

    /// Declare that `A` converts `F` into `T`
    pub fn adapts<F, T>(&mut self) -> &mut Self
    where
        F: Viewable + ?Sized,
        T: 'static,
        A: Adapter<F, T>,
    {
        self.pairs.push(Capability {
            shape: AdapterShape::of::<F, T>(),
            fallible: false,
            bind: bind_infallible::<F, T, A>,
        });
        self
    }

    /// Declare that `A` converts `F` into `T` and may fail
    pub fn try_adapts<F, T>(&mut self) -> &mut Self
    where
        F: Viewable + ?Sized,
        T: 'static,
        A: TryAdapter<F, T>,
    {
        self.pairs.push(Capability {
            shape: AdapterShape::of::<F, T>(),
            fallible: true,
            bind: bind_fallible::<F, T, A>,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn into_pairs(self) -> Vec<Capability<A>> {
        self.pairs
    }
}
