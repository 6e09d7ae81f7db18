//! Runtime type identity for adaptation
//!
//! `TypeKey` is the unit every cache in the engine is keyed by. It wraps a
//! `TypeId` and carries the type name purely for diagnostics; two keys are
//! equal exactly when their `TypeId`s are.

pub mod projection;

pub use projection::{Project, Projection, Viewable};

use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name used for types that were only ever seen through `&dyn Any`.
const UNDECLARED_NAME: &str = "<undeclared>";

/// Identity of a runtime type, with its name kept for logs and introspection
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Key of the universal root (`dyn Any`)
    ///
    /// Every hierarchy ends with the root, so an adapter declared from
    /// `dyn Any` is a candidate for any source value.
    pub fn root() -> Self {
        Self::of::<dyn Any>()
    }

    /// Key for a type known only by its `TypeId`
    pub(crate) fn undeclared(id: TypeId) -> Self {
        Self {
            id,
            name: UNDECLARED_NAME,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_root(&self) -> bool {
        self.id == TypeId::of::<dyn Any>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for TypeKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Probe;

    #[test]
    fn keys_compare_by_type_id_only() {
        let named = TypeKey::of::<Probe>();
        let unnamed = TypeKey::undeclared(TypeId::of::<Probe>());

        assert_eq!(named, unnamed);
        assert_eq!(unnamed.name(), UNDECLARED_NAME);

        let set: HashSet<TypeKey> = [named, unnamed].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn root_is_dyn_any() {
        assert!(TypeKey::root().is_root());
        assert!(!TypeKey::of::<Probe>().is_root());
        assert_eq!(TypeKey::root().id(), TypeId::of::<dyn Any>());
    }

    #[test]
    fn display_uses_type_name() {
        let key = TypeKey::of::<String>();
        assert_eq!(key.to_string(), "alloc::string::String");
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            "\"alloc::string::String\""
        );
    }
}
