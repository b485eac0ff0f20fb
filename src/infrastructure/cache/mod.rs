//! Cache infrastructure - Coalescing batch cache and its input binding

mod binding;
mod lazy_batch;

pub use binding::{CacheBinding, Snapshot};
pub use lazy_batch::LazyBatchCache;
