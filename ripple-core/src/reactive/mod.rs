//! Reactive Primitives
//!
//! This module implements the core reactive engine: tracked objects,
//! reactive views, effects, and computed values.
//!
//! # Concepts
//!
//! ## Tracked objects and views
//!
//! An [`ObjectRef`] is a plain, string-keyed data object. Wrapping it with
//! [`ReactiveRuntime::reactive`] produces a [`ReactiveView`]: reads through
//! the view register the currently running effect as a subscriber of that
//! property, and writes through the view re-run every subscriber.
//!
//! ## Effects
//!
//! An [`Effect`] is a re-runnable computation. While it runs, every view
//! read inside it subscribes it to that property. An effect that writes a
//! property it itself depends on does not recurse; the nested run is
//! silently skipped.
//!
//! ## Computed values
//!
//! A [`Computed`] is a lazy effect exposed as a value-bearing handle. It
//! caches nothing: every read re-runs the computation.
//!
//! # Implementation Notes
//!
//! Dependency detection uses a thread-local effect execution stack: reads
//! attribute themselves to whichever effect is on top. This "automatic
//! dependency tracking" approach is the one used by SolidJS, Vue 3, and
//! Leptos. The dependency graph itself lives in an explicitly owned
//! [`ReactiveRuntime`], so independent runtimes can coexist and be torn
//! down by dropping their handles.

mod computed;
mod context;
mod effect;
mod runtime;
mod value;
mod view;

pub use computed::Computed;
pub use context::EffectStack;
pub use effect::{Effect, EffectKind, EffectOptions};
pub use runtime::{ChangeInfo, ReactiveRuntime};
pub use value::{ObjectRef, Value};
pub use view::{ReactiveView, ReadValue};
