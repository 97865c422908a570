//! Reactive Runtime
//!
//! The runtime owns the dependency graph: the mapping from tracked object
//! and property key to the set of subscribed effects. It is the component
//! that connects reads to subscriptions (`track`) and writes to re-runs
//! (`trigger`).
//!
//! # How It Works
//!
//! 1. A view read calls `track`. If an effect is running, it is subscribed
//!    to that (object, key); reads outside any effect subscribe nothing.
//!
//! 2. A view write calls `trigger`. Subscribers of that (object, key) are
//!    partitioned by kind and re-invoked: all plain effects first, then all
//!    computed ones.
//!
//! # Ownership
//!
//! The runtime is an explicitly owned context object, not a process-wide
//! singleton. Handles are cheap clones sharing one graph; independent
//! runtimes never observe each other's subscriptions and are torn down by
//! dropping the last handle.
//!
//! The graph never keeps a tracked object alive: object entries are keyed
//! by id and hold only a weak handle to the object's fields, used by
//! [`ReactiveRuntime::sweep`] to drop entries for objects that no longer
//! exist anywhere else.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use tracing::trace;

use crate::error::ReactiveError;

use super::computed::Computed;
use super::context::EffectStack;
use super::effect::{Effect, EffectKind, EffectOptions};
use super::value::{FieldMap, ObjectRef, Value};
use super::view::ReactiveView;

/// What a write changed, handed to `trigger` by the interception layer.
///
/// The old value is captured before the assignment. Propagation itself does
/// not consume it; effects are re-invoked with no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeInfo {
    pub old_value: Value,
    pub new_value: Value,
}

/// Dependency data for one tracked object.
struct ObjectDeps {
    /// Weak handle to the object's fields; dead once the object is gone.
    target: Weak<parking_lot::RwLock<FieldMap>>,

    /// Property key -> subscribed effects. Insertion idempotent; iteration
    /// order within a set is an implementation detail callers must not rely
    /// on.
    keys: IndexMap<String, IndexSet<Effect>>,
}

#[derive(Default)]
struct RuntimeInner {
    /// Object id -> per-key subscriber sets.
    graph: RwLock<HashMap<u64, ObjectDeps>>,
}

/// An owned reactive runtime context.
///
/// Cloning produces another handle to the same runtime. All operations are
/// synchronous and run to completion before the caller regains control.
#[derive(Clone, Default)]
pub struct ReactiveRuntime {
    inner: Arc<RuntimeInner>,
}

impl ReactiveRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `target` in a reactive view bound to this runtime.
    ///
    /// Only the top-level object is wrapped here; nested object-valued
    /// properties are wrapped lazily, on read. Also sweeps graph entries
    /// whose objects are gone.
    pub fn reactive(&self, target: ObjectRef) -> ReactiveView {
        self.sweep();
        ReactiveView::new(self.clone(), target)
    }

    /// Create an effect from `f`.
    ///
    /// Unless `options.lazy` is set, the effect runs once immediately to
    /// establish its initial subscriptions; a failure in that first run
    /// surfaces here. The returned handle can be re-invoked manually at any
    /// time via [`Effect::call`].
    pub fn effect<F>(&self, f: F, options: EffectOptions) -> Result<Effect, ReactiveError>
    where
        F: Fn() -> Result<Value, ReactiveError> + Send + Sync + 'static,
    {
        let kind = if options.computed {
            EffectKind::Computed
        } else {
            EffectKind::Plain
        };
        let effect = Effect::new(f, kind, options.lazy);

        if !options.lazy {
            effect.call()?;
        }

        Ok(effect)
    }

    /// Create a computed value from `f`.
    ///
    /// The computation is lazy: it does not run here, only on reads of
    /// [`Computed::value`] and on propagation.
    pub fn computed<F>(&self, f: F) -> Computed
    where
        F: Fn() -> Result<Value, ReactiveError> + Send + Sync + 'static,
    {
        Computed::new(Effect::new(f, EffectKind::Computed, true))
    }

    /// Record that the currently running effect depends on `(target, key)`.
    ///
    /// No-op when no effect is running: one-off reads do not pollute the
    /// graph. Subscription is idempotent; the first insertion is also
    /// recorded on the effect's own dependency list.
    pub(crate) fn track(&self, target: &ObjectRef, key: &str) {
        let Some(effect) = EffectStack::current() else {
            return;
        };

        let mut graph = self.inner.graph.write();
        let entry = graph.entry(target.id()).or_insert_with(|| ObjectDeps {
            target: target.weak_fields(),
            keys: IndexMap::new(),
        });
        let subscribers = entry.keys.entry(key.to_owned()).or_default();

        if subscribers.insert(effect.clone()) {
            effect.record_dep(target.id(), key);
            trace!(
                object = target.id(),
                key,
                effect = effect.id(),
                "subscribed"
            );
        }
    }

    /// Re-run every effect subscribed to `(target, key)`.
    ///
    /// Plain effects run first, then computed ones; order within each group
    /// is unspecified. Effects are invoked with no arguments, after the
    /// graph lock is released so their own reads and writes can re-enter
    /// the runtime. The first failing effect aborts the pass and its error
    /// propagates to the write that started it. Unknown targets and keys
    /// are silent no-ops.
    pub(crate) fn trigger(
        &self,
        target: &ObjectRef,
        key: &str,
        change: ChangeInfo,
    ) -> Result<(), ReactiveError> {
        let (plain, computed) = {
            let graph = self.inner.graph.read();
            let Some(subscribers) = graph
                .get(&target.id())
                .and_then(|entry| entry.keys.get(key))
            else {
                return Ok(());
            };

            let mut plain = Vec::new();
            let mut computed = Vec::new();
            for effect in subscribers {
                match effect.kind() {
                    EffectKind::Plain => plain.push(effect.clone()),
                    EffectKind::Computed => computed.push(effect.clone()),
                }
            }
            (plain, computed)
        };

        trace!(
            object = target.id(),
            key,
            ?change,
            plain = plain.len(),
            computed = computed.len(),
            "trigger"
        );

        for effect in plain {
            effect.call()?;
        }
        for effect in computed {
            effect.call()?;
        }

        Ok(())
    }

    /// Drop graph entries whose tracked object no longer exists anywhere.
    ///
    /// Returns the number of entries removed. Called opportunistically by
    /// [`ReactiveRuntime::reactive`]; callable directly for deterministic
    /// teardown.
    pub fn sweep(&self) -> usize {
        let mut graph = self.inner.graph.write();
        let before = graph.len();
        graph.retain(|_, deps| deps.target.strong_count() > 0);
        before - graph.len()
    }

    /// Number of objects with live graph entries.
    pub fn tracked_objects(&self) -> usize {
        self.inner.graph.read().len()
    }

    /// Number of effects subscribed to `(target, key)`.
    pub fn subscriber_count(&self, target: &ObjectRef, key: &str) -> usize {
        self.inner
            .graph
            .read()
            .get(&target.id())
            .and_then(|entry| entry.keys.get(key))
            .map_or(0, IndexSet::len)
    }
}

impl std::fmt::Debug for ReactiveRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveRuntime")
            .field("tracked_objects", &self.tracked_objects())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
