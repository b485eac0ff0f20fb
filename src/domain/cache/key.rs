//! Cache key contract

use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a cache slot.
///
/// Equal queries must map to equal keys; the cache never inspects a key
/// beyond hashing and comparing it.
pub trait CacheKey: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T> CacheKey for T where T: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}
