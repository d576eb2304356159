//! Callback results with an explicit "leave it alone" case.

/// Result of an element callback.
///
/// [`Store::Skip`] leaves the destination element exactly as it was. Every
/// value of `T`, including `0` and `NaN`, is written as-is.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Store<T> {
    /// Write this value to the destination.
    Write(T),
    /// Do not touch the destination.
    Skip,
}

impl<T> Store<T> {
    #[inline]
    pub fn is_write(&self) -> bool {
        matches!(self, Store::Write(_))
    }

    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self, Store::Skip)
    }

    /// Convert into an `Option`, `Skip` becoming `None`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Store::Write(v) => Some(v),
            Store::Skip => None,
        }
    }

    /// Map the stored value, keeping `Skip` as is.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Store<U> {
        match self {
            Store::Write(v) => Store::Write(f(v)),
            Store::Skip => Store::Skip,
        }
    }
}

impl<T> From<Option<T>> for Store<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Store::Write(v),
            None => Store::Skip,
        }
    }
}
