//! Computed Facade
//!
//! A Computed presents one lazy, computed-kind effect as a value-bearing
//! handle. It holds no state of its own: there is no cached result and no
//! dirty flag, so every read re-runs the computation. Repeated reads are
//! always correct, the work is just repeated.
//!
//! When an upstream property the computation read is later written, the
//! runtime re-invokes the underlying effect during propagation, but with
//! nothing cached that trigger-time result is discarded; the recomputation
//! is only observed on the next [`Computed::value`] read.

use crate::error::ReactiveError;

use super::effect::Effect;
use super::value::Value;

/// A read-only facade over one lazy, computed-kind [`Effect`].
#[derive(Debug, Clone)]
pub struct Computed {
    effect: Effect,
}

impl Computed {
    pub(crate) fn new(effect: Effect) -> Self {
        debug_assert!(effect.is_lazy());
        Self { effect }
    }

    /// The underlying effect, for callers who want to trigger or inspect it
    /// directly.
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Read the computed value.
    ///
    /// Every access re-runs the computation; the first access is also the
    /// first time the computation runs at all. A failure inside the
    /// computation propagates to this read.
    pub fn value(&self) -> Result<Value, ReactiveError> {
        self.effect.call()
    }
}
