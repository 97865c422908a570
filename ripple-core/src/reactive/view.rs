//! Interception Layer
//!
//! A [`ReactiveView`] is the capability-based wrapper over a tracked
//! object: reads go through a tracking hook, writes through a propagation
//! hook. It is a *view*, not a clone; raw reads and writes through the
//! underlying [`ObjectRef`] stay visible here, but only writes through the
//! view propagate.
//!
//! Reading an object-valued property wraps the nested object on the fly
//! into a fresh view. Wrapping is not cached: two reads of the same
//! property yield two distinct views over the same underlying object.
//! Views carry no state of their own, so the duplicate wrappers still
//! track and propagate against the same subscriptions.

use crate::error::ReactiveError;

use super::runtime::{ChangeInfo, ReactiveRuntime};
use super::value::{ObjectRef, Value};

/// Result of a tracked property read.
pub enum ReadValue {
    /// A scalar (or null) snapshot of the property.
    Value(Value),

    /// An object-valued property, wrapped into a nested reactive view.
    View(ReactiveView),
}

impl ReadValue {
    /// The raw value behind this read; for a nested view, the underlying
    /// object itself.
    pub fn as_value(&self) -> Value {
        match self {
            ReadValue::Value(value) => value.clone(),
            ReadValue::View(view) => Value::Object(view.target().clone()),
        }
    }

    pub fn as_view(&self) -> Option<&ReactiveView> {
        match self {
            ReadValue::View(view) => Some(view),
            ReadValue::Value(_) => None,
        }
    }

    pub fn into_view(self) -> Option<ReactiveView> {
        match self {
            ReadValue::View(view) => Some(view),
            ReadValue::Value(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ReadValue::Value(Value::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ReadValue::Value(value) => value.as_bool(),
            ReadValue::View(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ReadValue::Value(value) => value.as_i64(),
            ReadValue::View(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadValue::Value(value) => value.as_f64(),
            ReadValue::View(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReadValue::Value(value) => value.as_str(),
            ReadValue::View(_) => None,
        }
    }
}

impl std::fmt::Debug for ReadValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ReadValue::View(view) => f.debug_tuple("View").field(&view.target().id()).finish(),
        }
    }
}

/// A reactive view over a tracked object.
///
/// Cloning yields another view over the same object, bound to the same
/// runtime.
#[derive(Clone)]
pub struct ReactiveView {
    runtime: ReactiveRuntime,
    target: ObjectRef,
}

impl ReactiveView {
    pub(crate) fn new(runtime: ReactiveRuntime, target: ObjectRef) -> Self {
        Self { runtime, target }
    }

    /// The underlying tracked object.
    pub fn target(&self) -> &ObjectRef {
        &self.target
    }

    /// The runtime this view is bound to.
    pub fn runtime(&self) -> &ReactiveRuntime {
        &self.runtime
    }

    /// Read a property.
    ///
    /// Subscribes the currently running effect, if any, to `(target, key)`.
    /// Absent properties read as null. Object values come back wrapped in a
    /// fresh nested view.
    pub fn get(&self, key: &str) -> ReadValue {
        let value = self.target.get(key);
        self.runtime.track(&self.target, key);

        match value {
            Value::Object(nested) => {
                ReadValue::View(ReactiveView::new(self.runtime.clone(), nested))
            }
            value => ReadValue::Value(value),
        }
    }

    /// Write a property and propagate.
    ///
    /// The previous value is captured first, then the assignment happens,
    /// then every subscribed effect re-runs. Propagation is attempted
    /// unconditionally; with no subscribers it is a cheap no-op. A failure
    /// raised by a re-run effect propagates out of this call, with the
    /// assignment already applied.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), ReactiveError> {
        let new_value = value.into();
        let old_value = self.target.insert(key, new_value.clone());
        self.runtime.trigger(
            &self.target,
            key,
            ChangeInfo {
                old_value,
                new_value,
            },
        )
    }
}

impl std::fmt::Debug for ReactiveView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveView")
            .field("target", &self.target.id())
            .finish()
    }
}
