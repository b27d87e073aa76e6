//! Error types for grid traversal.

use std::error::Error;
use std::fmt;

/// Errors raised while enumerating a [`SparseBoolGrid`](crate::SparseBoolGrid).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid was mutated after the traversal started.
    ///
    /// A detached [`Cursor`](crate::Cursor) snapshots the grid version when
    /// it is created and refuses to continue once the live version differs.
    ConcurrentModification {
        /// Version observed when the traversal started.
        expected: u64,
        /// Version observed at the failing step.
        found: u64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConcurrentModification { expected, found } => write!(
                f,
                "grid was modified during enumeration (version {expected} -> {found})"
            ),
        }
    }
}

impl Error for GridError {}
