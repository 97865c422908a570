//! Integration Tests for the Reactive Engine
//!
//! These tests verify that views, effects, and computed values work
//! together correctly: tracking, propagation, ordering, re-entrancy, and
//! failure behavior.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use ripple_core::error::ReactiveError;
use ripple_core::object;
use ripple_core::reactive::{EffectOptions, EffectStack, ReactiveRuntime, Value};

/// Reading `obj.x` inside an effect, then writing `obj.x`, re-runs that
/// effect exactly once per write.
#[test]
fn write_reruns_subscribed_effect_once_per_write() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });

    let runs = Arc::new(AtomicI64::new(0));
    let effect = {
        let state = state.clone();
        let runs = runs.clone();
        rt.effect(
            move || {
                let _ = state.get("x");
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap()
    };

    // Ran once immediately.
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    state.set("x", 1).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    state.set("x", 2).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 3);
    assert_eq!(effect.run_count(), 3);
}

/// Reads with no effect on the stack create no subscription; a later write
/// invokes nothing.
#[test]
fn read_outside_effect_does_not_subscribe() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });

    assert_eq!(state.get("x").as_i64(), Some(0));
    assert_eq!(rt.subscriber_count(state.target(), "x"), 0);

    // Writing still succeeds and is a cheap no-op propagation.
    state.set("x", 1).unwrap();
    assert_eq!(state.get("x").as_i64(), Some(1));
}

/// An effect that reads the same property twice in one run is subscribed
/// once: one write, one re-run.
#[test]
fn subscription_is_idempotent() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });

    let runs = Arc::new(AtomicI64::new(0));
    let effect = {
        let state = state.clone();
        let runs = runs.clone();
        rt.effect(
            move || {
                let _ = state.get("x");
                let _ = state.get("x");
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap()
    };

    assert_eq!(rt.subscriber_count(state.target(), "x"), 1);
    assert_eq!(effect.dependency_count(), 1);

    state.set("x", 1).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// An effect subscribed only to `x` does not re-run when `y` is written.
#[test]
fn effects_are_isolated_by_key() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0, "y" => 0 });

    let runs = Arc::new(AtomicI64::new(0));
    {
        let state = state.clone();
        let runs = runs.clone();
        rt.effect(
            move || {
                let _ = state.get("x");
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap();
    }

    state.set("y", 99).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    state.set("x", 1).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// With one plain and one computed effect subscribed to the same property,
/// a write runs the plain effect first.
#[test]
fn plain_effects_run_before_computed_effects() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });
    let order = Arc::new(Mutex::new(Vec::new()));

    // Subscribe the computed side first so insertion order cannot mask a
    // missing partition.
    let doubled = {
        let state = state.clone();
        let order = order.clone();
        rt.computed(move || {
            order.lock().push("computed");
            Ok(Value::Int(state.get("x").as_i64().unwrap_or(0) * 2))
        })
    };
    doubled.value().unwrap();

    {
        let state = state.clone();
        let order = order.clone();
        rt.effect(
            move || {
                order.lock().push("plain");
                let _ = state.get("x");
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap();
    }

    order.lock().clear();
    state.set("x", 1).unwrap();

    assert_eq!(*order.lock(), vec!["plain", "computed"]);
}

/// An effect that writes a property it depends on does not recurse; the
/// nested trigger is a no-op and the original run completes.
#[test]
fn self_triggering_effect_does_not_recurse() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });

    let runs = Arc::new(AtomicI64::new(0));
    {
        let state = state.clone();
        let runs = runs.clone();
        rt.effect(
            move || {
                let current = state.get("x").as_i64().unwrap();
                runs.fetch_add(1, Ordering::SeqCst);
                // Writes back into its own dependency.
                state.set("x", current + 1)?;
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap();
    }

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(state.get("x").as_i64(), Some(1));

    // An external write re-runs it exactly once more.
    state.set("x", 10).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(state.get("x").as_i64(), Some(11));
}

/// `computed` does not run its function at construction; the first run
/// happens on the first value read.
#[test]
fn computed_is_lazy_until_first_read() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 3 });

    let runs = Arc::new(AtomicI64::new(0));
    let doubled = {
        let state = state.clone();
        let runs = runs.clone();
        rt.computed(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Int(state.get("x").as_i64().unwrap() * 2))
        })
    };

    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(doubled.value().unwrap(), Value::Int(6));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// After a dependency write, reading the computed again reflects the new
/// state.
#[test]
fn computed_recomputes_on_read_after_write() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 2 });

    let doubled = {
        let state = state.clone();
        rt.computed(move || Ok(Value::Int(state.get("x").as_i64().unwrap() * 2)))
    };

    assert_eq!(doubled.value().unwrap(), Value::Int(4));

    // The write also re-runs the computed during propagation (its result is
    // discarded); the next read recomputes and observes the new state.
    state.set("x", 5).unwrap();
    assert_eq!(doubled.value().unwrap(), Value::Int(10));
}

/// Nested objects read through a view are themselves tracked and
/// propagated.
#[test]
fn nested_objects_are_wrapped_on_read() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "a" => object! { "b" => 1 } });

    let seen = Arc::new(AtomicI64::new(0));
    {
        let state = state.clone();
        let seen = seen.clone();
        rt.effect(
            move || {
                let inner = state.get("a").into_view().unwrap();
                seen.store(inner.get("b").as_i64().unwrap(), Ordering::SeqCst);
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap();
    }
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    // Writing through a freshly wrapped handle propagates to the effect,
    // because subscriptions key on the underlying object's identity.
    let inner = state.get("a").into_view().unwrap();
    inner.set("b", 7).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 7);
}

/// A failing effect surfaces its error at the triggering write, and leaves
/// the execution stack empty so unrelated work continues normally.
#[test]
fn failure_propagates_and_leaves_stack_clean() {
    let rt = ReactiveRuntime::new();
    let state = rt.reactive(object! { "x" => 0 });

    let should_fail = Arc::new(AtomicI64::new(0));
    {
        let state = state.clone();
        let should_fail = should_fail.clone();
        rt.effect(
            move || {
                let _ = state.get("x");
                if should_fail.load(Ordering::SeqCst) != 0 {
                    return Err(ReactiveError::computation("reaction exploded"));
                }
                Ok(Value::Null)
            },
            EffectOptions::default(),
        )
        .unwrap();
    }

    should_fail.store(1, Ordering::SeqCst);
    let err = state.set("x", 1).unwrap_err();
    assert!(matches!(err, ReactiveError::Computation(_)));

    // The stack is back to rest; the assignment itself already happened.
    assert!(!EffectStack::is_active());
    assert_eq!(state.get("x").as_i64(), Some(1));

    // Unrelated reactive work still behaves normally afterward.
    should_fail.store(0, Ordering::SeqCst);
    state.set("x", 2).unwrap();
    assert_eq!(state.get("x").as_i64(), Some(2));
}

/// A failing immediate first run surfaces at effect construction.
#[test]
fn eager_effect_construction_surfaces_first_run_failure() {
    let rt = ReactiveRuntime::new();

    let err = rt
        .effect(
            || Err(ReactiveError::computation("bad setup")),
            EffectOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ReactiveError::Computation(_)));
    assert!(!EffectStack::is_active());

    // A lazy construction with the same function is fine until invoked.
    let effect = rt
        .effect(
            || Err(ReactiveError::computation("bad setup")),
            EffectOptions {
                lazy: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert!(effect.call().is_err());
    assert!(!EffectStack::is_active());
}
