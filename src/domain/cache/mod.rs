//! Cache domain - Batch fetch contract for the coalescing cache

mod entry;
mod key;
mod source;

pub use entry::{CacheError, EntryStatus, Slot};
pub use key::CacheKey;
pub use source::{AugmentedData, BatchSource};

#[cfg(test)]
pub use source::mock;
