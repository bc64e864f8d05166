//! Object Recycler
//!
//! Graph construction in a maze game is bursty: a level builds thousands of
//! cells and walls, throws them all away on the next level, and builds them
//! again. The recycler keeps destroyed instances around per type so the next
//! build reuses their buffers instead of allocating.
//!
//! # Protocol
//!
//! 1. `create_or_recycle::<T>(hint)` hands out a *blank* instance, either a
//!    previously released one or a fresh `T::blank(hint)`.
//! 2. The caller brings it into a valid state with the type's own `init`.
//! 3. `recycle(item)` runs `destroy()` and parks the instance for reuse.
//!
//! Release takes the instance by value, so nothing reachable from live graph
//! state can sit in a free list.
//!
//! # Lifecycle
//!
//! There is no process global. Whoever owns the simulation creates one
//! `Recycler`, wraps it in an `Arc`, and hands clones to every graph it
//! builds. Tests create their own.

mod pool;
mod stats;

pub use pool::Recycler;
pub use stats::PoolStats;

/// A type whose instances can be parked in a [`Recycler`] and reused.
pub trait Recyclable: Send + 'static {
    /// Construct a fresh blank instance. `size_hint` pre-sizes internal
    /// collections; it is not a capacity limit.
    fn blank(size_hint: usize) -> Self;

    /// Clear payload and references, keeping allocated capacity.
    fn destroy(&mut self);
}
