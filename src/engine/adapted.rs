use std::fmt;
use std::ops::Deref;

/// Result of a successful adaptation
///
/// `Same` borrows the input (or the ancestor view of it) when the value
/// already satisfied the target type. `Converted` owns what an adapter
/// produced.
pub enum Adapted<'a, T> {
    Same(&'a T),
    Converted(T),
}

impl<'a, T> Adapted<'a, T> {
    /// Whether no adapter was involved
    pub fn is_same(&self) -> bool {
        matches!(self, Adapted::Same(_))
    }

    /// The adapter's output, if an adapter produced this value
    pub fn converted(self) -> Option<T> {
        match self {
            Adapted::Same(_) => None,
            Adapted::Converted(value) => Some(value),
        }
    }

    pub fn into_owned(self) -> T
    where
        T: Clone,
    {
        match self {
            Adapted::Same(value) => value.clone(),
            Adapted::Converted(value) => value,
        }
    }
}

impl<T> Deref for Adapted<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Adapted::Same(value) => value,
            Adapted::Converted(value) => value,
        }
    }
}

impl<T> AsRef<T> for Adapted<'_, T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for Adapted<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adapted::Same(value) => f.debug_tuple("Same").field(value).finish(),
            Adapted::Converted(value) => f.debug_tuple("Converted").field(value).finish(),
        }
    }
}
