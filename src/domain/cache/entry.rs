//! Cache entry state as observed by callers

use std::sync::Arc;

use thiserror::Error;

use crate::domain::DomainError;

/// Resolved value of one cache slot: the data items the batch routed to its key
pub type Slot<D> = Arc<Vec<D>>;

/// Snapshot of a slot, as returned by a non-suspending peek
#[derive(Debug, Clone)]
pub enum EntryStatus<D> {
    /// Never requested, invalidated, or reverted after a failed fetch
    Absent,
    /// A fetch covering this key is in flight
    Pending,
    /// Resolved data
    Complete(Slot<D>),
}

impl<D> EntryStatus<D> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Resolved data, if any
    pub fn data(&self) -> Option<&Slot<D>> {
        match self {
            Self::Complete(data) => Some(data),
            _ => None,
        }
    }
}

/// Error delivered to every waiter of a failed fetch.
///
/// Cloneable so that all waiters observe the same underlying error value.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Fetch failed: {0}")]
    Fetch(Arc<DomainError>),

    #[error("Fetch abandoned before completion")]
    Abandoned,
}

impl CacheError {
    pub fn fetch(error: DomainError) -> Self {
        Self::Fetch(Arc::new(error))
    }

    /// The domain error raised by the fetch function, if that is what failed
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Fetch(error) => Some(error),
            Self::Abandoned => None,
        }
    }
}
