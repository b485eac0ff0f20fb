//! Mutation Annotation Cache
//!
//! Resolves point mutations and structural variants to clinical annotation
//! records, with:
//! - A request-coalescing batch cache for remote lookups
//! - Collision-free variant ids for point mutations and structural variants
//! - Position grouping of resolved indicators
//! - Sort scores, icon offsets and alteration-name compaction

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use infrastructure::cache::{CacheBinding, LazyBatchCache};
