//! Borrowed views of a value as one of its ancestors
//!
//! A hierarchy edge `Sub -> Super` is declared with a projection
//! `fn(&Sub) -> &Super`. Edges are erased to `&dyn Any -> &dyn Any` so that a
//! breadth-first path of any length can be replayed on a concrete value.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Types an adapter can accept as its `From` side
///
/// Every sized `'static` type is viewed by downcasting. The root, `dyn Any`,
/// is viewed as the value itself.
pub trait Viewable: 'static {
    fn view(value: &dyn Any) -> Option<&Self>;
}

impl<T: Any> Viewable for T {
    fn view(value: &dyn Any) -> Option<&T> {
        value.downcast_ref::<T>()
    }
}

impl Viewable for dyn Any {
    fn view(value: &dyn Any) -> Option<&dyn Any> {
        Some(value)
    }
}

/// One erased hierarchy step
pub trait Project: Send + Sync {
    /// Borrow `value` as the supertype, or `None` if `value` is not the subtype
    fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any>;
}

/// Typed edge built from a declaration
pub(crate) struct Edge<Sub, Super> {
    project: fn(&Sub) -> &Super,
}

impl<Sub, Super> Edge<Sub, Super> {
    pub(crate) fn new(project: fn(&Sub) -> &Super) -> Self {
        Self { project }
    }
}

impl<Sub: Any, Super: Any> Project for Edge<Sub, Super> {
    fn project<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        let sub = value.downcast_ref::<Sub>()?;
        Some((self.project)(sub))
    }
}

/// A composed path of edges from a concrete type to one of its ancestors
#[derive(Clone)]
pub struct Projection {
    steps: Arc<[Arc<dyn Project>]>,
}

impl Projection {
    /// The empty path, used for the type itself and for the root
    pub fn identity() -> Self {
        Self {
            steps: Arc::from(Vec::new()),
        }
    }

    /// This path extended by one more edge
    pub(crate) fn then(&self, step: Arc<dyn Project>) -> Self {
        let mut steps: Vec<Arc<dyn Project>> = self.steps.iter().cloned().collect();
        steps.push(step);
        Self {
            steps: Arc::from(steps),
        }
    }

    /// Replay the path on `value`
    pub fn apply<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        self.steps
            .iter()
            .try_fold(value, |current, step| step.project(current))
    }

    /// Number of edges in the path
    pub fn hops(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("hops", &self.steps.len())
            .finish()
    }
}
