//! Ripple Core
//!
//! This crate implements a minimal reactive dependency-tracking runtime:
//! plain data objects are wrapped in views, computations ("effects") that
//! read wrapped properties are subscribed automatically, and writes through
//! a view re-run exactly the effects that depend on the written property.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: tracked objects, views, effects, computed values, and the
//!   runtime that owns the dependency graph
//! - `error`: the (deliberately small) error surface
//!
//! Everything is synchronous and single-stack: tracking, propagation, and
//! effect re-runs all complete before the caller regains control. There is
//! no batching, no scheduler, and no cross-thread execution.
//!
//! # Example
//!
//! ```rust
//! use ripple_core::object;
//! use ripple_core::reactive::{EffectOptions, ReactiveRuntime, Value};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//!
//! let rt = ReactiveRuntime::new();
//! let state = rt.reactive(object! { "count" => 0 });
//!
//! let seen = Arc::new(AtomicI64::new(-1));
//! let effect = {
//!     let state = state.clone();
//!     let seen = seen.clone();
//!     rt.effect(
//!         move || {
//!             seen.store(state.get("count").as_i64().unwrap(), Ordering::SeqCst);
//!             Ok(Value::Null)
//!         },
//!         EffectOptions::default(),
//!     )?
//! };
//!
//! // The effect ran once immediately.
//! assert_eq!(seen.load(Ordering::SeqCst), 0);
//!
//! // Writing through the view re-runs it.
//! state.set("count", 5)?;
//! assert_eq!(seen.load(Ordering::SeqCst), 5);
//! assert_eq!(effect.run_count(), 2);
//! # Ok::<(), ripple_core::error::ReactiveError>(())
//! ```

pub mod error;
pub mod reactive;
