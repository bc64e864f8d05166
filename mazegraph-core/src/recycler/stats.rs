//! Per-type pool counters.

use serde::Serialize;

/// Counters for one pooled type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Instances constructed with `Recyclable::blank`.
    pub allocated: usize,

    /// Acquisitions served from the idle list.
    pub reused: usize,

    /// Instances handed back through `recycle`.
    pub released: usize,

    /// Released instances dropped because the idle list was full.
    pub discarded: usize,

    /// Instances currently parked.
    pub idle: usize,
}

impl PoolStats {
    /// Total acquisitions, fresh or reused.
    pub fn acquired(&self) -> usize {
        self.allocated + self.reused
    }

    /// Instances acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired().saturating_sub(self.released)
    }
}
