//! Effect Implementation
//!
//! An Effect is a re-runnable unit of computation. While it runs, reactive
//! reads attribute themselves to it, which is how the dependency graph is
//! built.
//!
//! # How Effects Work
//!
//! 1. An eager effect runs once at creation to establish its initial
//!    dependencies; a lazy one waits for its first invocation.
//!
//! 2. When a tracked property the effect read is later written, the runtime
//!    re-invokes the effect.
//!
//! 3. Subscriptions are additive: an effect stays subscribed to every
//!    property it has ever read, even if a later run no longer reads it.
//!    There is no cleanup pass between runs.
//!
//! # Plain vs Computed
//!
//! Effects come in two kinds. Plain effects run for their side effects;
//! computed effects exist to produce a value exposed through a
//! [`Computed`](super::Computed) handle. When one write triggers both kinds,
//! every plain effect runs before any computed one, so a plain reaction
//! never observes a computed value recomputed mid-propagation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::ReactiveError;

use super::context::RunGuard;
use super::value::Value;

/// Counter for generating unique effect IDs.
static EFFECT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique effect ID.
fn next_effect_id() -> u64 {
    EFFECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// The two kinds of effect, distinguished at trigger time: plain effects
/// run before computed ones within a single propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// A side-effecting reaction.
    Plain,

    /// A value-producing computation behind a [`Computed`](super::Computed)
    /// handle.
    Computed,
}

/// Construction options for [`ReactiveRuntime::effect`](super::ReactiveRuntime::effect).
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectOptions {
    /// Mark the effect as computed (see [`EffectKind::Computed`]).
    pub computed: bool,

    /// Skip the immediate first run.
    pub lazy: bool,
}

/// A property an effect is subscribed to: (object id, property key).
type DepKey = (u64, String);

/// The wrapped computation.
type EffectFn = dyn Fn() -> Result<Value, ReactiveError> + Send + Sync;

struct EffectInner {
    /// Unique identifier; also the effect's identity for equality and
    /// hashing, so subscriber sets compare effects by reference, not
    /// behavior.
    id: u64,

    kind: EffectKind,

    lazy: bool,

    /// The effect function.
    run: Box<EffectFn>,

    /// Properties this effect has subscribed to, in subscription order.
    /// Bookkeeping only; nothing reads it back for cleanup.
    deps: RwLock<SmallVec<[DepKey; 4]>>,

    /// Number of completed runs (suppressed re-entrant runs not counted).
    run_count: AtomicU64,
}

/// A re-runnable unit of computation.
///
/// `Effect` is a cheap handle; clones share the same identity and state.
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectInner>,
}

impl Effect {
    pub(crate) fn new<F>(run: F, kind: EffectKind, lazy: bool) -> Self
    where
        F: Fn() -> Result<Value, ReactiveError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(EffectInner {
                id: next_effect_id(),
                kind,
                lazy,
                run: Box::new(run),
                deps: RwLock::new(SmallVec::new()),
                run_count: AtomicU64::new(0),
            }),
        }
    }

    /// Get the effect's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn kind(&self) -> EffectKind {
        self.inner.kind
    }

    /// Whether the effect skipped its immediate first run at creation.
    pub fn is_lazy(&self) -> bool {
        self.inner.lazy
    }

    /// Invoke the effect.
    ///
    /// If the effect is already running anywhere on this thread's execution
    /// stack, the call is suppressed and returns `Ok(Value::Null)` without
    /// invoking the function; this guards an effect's own writes against
    /// unbounded synchronous recursion. Otherwise the function runs with
    /// this effect on top of the stack, so every reactive read inside it
    /// subscribes this effect. Failures propagate to the caller unchanged,
    /// and the stack is restored on every exit path.
    pub fn call(&self) -> Result<Value, ReactiveError> {
        let Some(_guard) = RunGuard::enter(self) else {
            trace!(effect = self.id(), "re-entrant run suppressed");
            return Ok(Value::Null);
        };

        let result = (self.inner.run)()?;
        self.inner.run_count.fetch_add(1, Ordering::Relaxed);
        Ok(result)
    }

    /// Number of completed runs.
    pub fn run_count(&self) -> u64 {
        self.inner.run_count.load(Ordering::Relaxed)
    }

    /// Number of (object, property) subscriptions recorded so far.
    pub fn dependency_count(&self) -> usize {
        self.inner.deps.read().len()
    }

    /// Record a subscription on the effect's own dependency list.
    ///
    /// Called by the runtime on first insertion into a subscriber set.
    pub(crate) fn record_dep(&self, object_id: u64, key: &str) {
        self.inner.deps.write().push((object_id, key.to_owned()));
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Effect {}

impl std::hash::Hash for Effect {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("lazy", &self.is_lazy())
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
