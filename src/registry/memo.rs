//! One-shot lazy values.

use std::fmt;

use once_cell::sync::OnceCell;

/// A value computed on first access by a factory that runs at most once,
/// even when several threads race for it. Losing threads block until the
/// winner finishes and then observe its value. There is no invalidation.
pub struct MemoizedSingleton<T> {
    cell: OnceCell<T>,
}

impl<T> MemoizedSingleton<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Already resolved to `value`; no factory will ever run.
    pub fn resolved(value: T) -> Self {
        Self {
            cell: OnceCell::with_value(value),
        }
    }

    pub fn get_or_init<F>(&self, factory: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(factory)
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for MemoizedSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for MemoizedSingleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Resolved").field(value).finish(),
            None => f.write_str("Unresolved"),
        }
    }
}
