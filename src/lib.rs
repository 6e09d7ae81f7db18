//! Runtime adapter resolution
//!
//! An [`AdapterEngine`] converts a value of an arbitrary concrete type into a
//! requested target type. Adapters declare `(From, To)` capability pairs; at
//! adaptation time the engine ranks every adapter whose `From` is an ancestor
//! of the value's type by hierarchy distance and returns the first non-empty
//! result.
//!
//! Types take part in the hierarchy through explicit declarations on a
//! [`TypeHierarchy`]. Undeclared types still work: they are their own only
//! ancestor besides the universal root, `dyn Any`.

pub mod candidates;
pub mod config;
pub mod engine;
pub mod errors;
pub mod hierarchy;
pub(crate) mod invoker;
pub mod observability;
pub mod registry;
pub mod types;

pub use crate::config::{EngineConfig, InertAdapterPolicy};
pub use crate::engine::{Adapted, AdapterEngine, CandidateInfo, EngineStats};
pub use crate::errors::{AdaptError, Result};
pub use crate::hierarchy::{TypeDeclaration, TypeHierarchy, TypeHierarchyBuilder};
pub use crate::registry::{Adapter, AdapterInfo, Capabilities, DeclareCapabilities, TryAdapter};
pub use crate::types::{TypeKey, Viewable};
