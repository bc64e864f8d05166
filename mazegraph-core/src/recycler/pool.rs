//! Type-keyed free lists behind a single mutex.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{PoolStats, Recyclable};
use crate::config::RecyclerConfig;

/// Idle instances of one type. `idle` always holds a `Vec<T>` for the `T`
/// whose `TypeId` keys this entry.
struct TypePool {
    type_name: &'static str,
    idle: Box<dyn Any + Send>,
    stats: PoolStats,
}

impl TypePool {
    fn new<T: Recyclable>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            idle: Box::new(Vec::<T>::new()),
            stats: PoolStats::default(),
        }
    }

    fn idle<T: Recyclable>(&mut self) -> &mut Vec<T> {
        self.idle
            .downcast_mut::<Vec<T>>()
            .expect("pool entry keyed by TypeId holds a Vec of that type")
    }
}

/// A shared pool handing out reusable instances of any [`Recyclable`] type.
///
/// Acquire and release lock one mutex, so graphs living on different threads
/// may share a recycler. Instances are constructed and dropped outside the
/// lock.
pub struct Recycler {
    config: RecyclerConfig,
    pools: Mutex<HashMap<TypeId, TypePool>>,
}

impl Recycler {
    /// Create a recycler with default settings.
    pub fn new() -> Self {
        Self::with_config(RecyclerConfig::default())
    }

    /// Create a recycler with explicit settings.
    pub fn with_config(config: RecyclerConfig) -> Self {
        Self {
            config,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Settings this recycler was created with.
    pub fn config(&self) -> &RecyclerConfig {
        &self.config
    }

    /// Hand out a blank instance of `T`.
    ///
    /// Reuses a parked instance when one exists; otherwise constructs one
    /// with `T::blank(size_hint)`. The result must be initialized by the
    /// caller before use.
    pub fn create_or_recycle<T: Recyclable>(&self, size_hint: usize) -> T {
        let mut pools = self.pools.lock();
        let pool = pools
            .entry(TypeId::of::<T>())
            .or_insert_with(TypePool::new::<T>);

        if let Some(item) = pool.idle::<T>().pop() {
            pool.stats.reused += 1;
            pool.stats.idle -= 1;
            trace!(ty = pool.type_name, idle = pool.stats.idle, "reused pooled instance");
            return item;
        }

        pool.stats.allocated += 1;
        trace!(ty = pool.type_name, size_hint, "allocating fresh instance");
        drop(pools);

        T::blank(size_hint)
    }

    /// Destroy `item` and park it for reuse.
    ///
    /// If a `max_idle_per_type` cap is configured and the idle list for `T`
    /// is already at it, the instance is dropped instead.
    pub fn recycle<T: Recyclable>(&self, mut item: T) {
        item.destroy();

        let mut pools = self.pools.lock();
        let pool = pools
            .entry(TypeId::of::<T>())
            .or_insert_with(TypePool::new::<T>);
        pool.stats.released += 1;

        if self
            .config
            .max_idle_per_type
            .is_some_and(|cap| pool.stats.idle >= cap)
        {
            pool.stats.discarded += 1;
            trace!(ty = pool.type_name, "idle list full, discarding instance");
            drop(pools);
            drop(item);
            return;
        }

        pool.idle::<T>().push(item);
        pool.stats.idle += 1;
    }

    /// Counters for `T`. All zero if `T` was never pooled here.
    pub fn stats<T: Recyclable>(&self) -> PoolStats {
        self.pools
            .lock()
            .get(&TypeId::of::<T>())
            .map(|pool| pool.stats)
            .unwrap_or_default()
    }

    /// Number of parked instances of `T`.
    pub fn idle_count<T: Recyclable>(&self) -> usize {
        self.stats::<T>().idle
    }

    /// Number of parked instances across all types.
    pub fn idle_total(&self) -> usize {
        self.pools.lock().values().map(|pool| pool.stats.idle).sum()
    }

    /// Drop every parked instance and reset all counters.
    pub fn purge(&self) {
        let drained = std::mem::take(&mut *self.pools.lock());
        debug!(types = drained.len(), "purging recycler");
        drop(drained);
    }
}

impl Default for Recycler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Recycler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pools = self.pools.lock();
        let mut types: Vec<_> = pools
            .values()
            .map(|pool| (pool.type_name, pool.stats))
            .collect();
        types.sort_by_key(|(name, _)| *name);
        f.debug_struct("Recycler")
            .field("config", &self.config)
            .field("pools", &types)
            .finish()
    }
}
