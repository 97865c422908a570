//! Value Model
//!
//! The runtime tracks plain data objects. Rust has no ambient dynamic object
//! type, so tracked objects are rendered explicitly: an [`ObjectRef`] is a
//! shared, string-keyed field map with a unique identity, and [`Value`] is
//! the dynamic value stored in its fields.
//!
//! An `ObjectRef` is the *raw* object. Reads and writes through it are not
//! tracked; tracking and propagation only happen through a
//! [`ReactiveView`](super::ReactiveView). The view is a view, not a clone:
//! both see the same underlying field map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;

/// Counter for generating unique object IDs.
static OBJECT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique object ID.
fn next_object_id() -> u64 {
    OBJECT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// The field map behind a tracked object. Insertion order is preserved.
pub(crate) type FieldMap = IndexMap<String, Value>;

/// A dynamic value stored in a tracked object's field.
///
/// `Null` doubles as the read result for an absent property, so reading a
/// key that was never written is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A nested plain object. Compared by identity, never structurally.
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

/// A plain data object the caller wants reactive.
///
/// Cloning an `ObjectRef` clones the handle, not the data: all clones share
/// the same field map and the same identity. Equality is identity equality.
pub struct ObjectRef {
    /// Unique identifier for this object.
    id: u64,

    /// The fields, shared between all handles to this object.
    fields: Arc<RwLock<FieldMap>>,
}

impl ObjectRef {
    /// Create a new empty object.
    pub fn new() -> Self {
        Self {
            id: next_object_id(),
            fields: Arc::new(RwLock::new(FieldMap::new())),
        }
    }

    /// Get the object's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read a field without tracking. Absent fields read as [`Value::Null`].
    pub fn get(&self, key: &str) -> Value {
        self.fields
            .read()
            .get(key)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Write a field without propagation, returning the previous value
    /// ([`Value::Null`] if the field was absent).
    pub fn insert(&self, key: &str, value: impl Into<Value>) -> Value {
        self.fields
            .write()
            .insert(key.to_owned(), value.into())
            .unwrap_or(Value::Null)
    }

    /// Write a field without propagation, discarding the previous value.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.insert(key, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    /// The field names, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    /// A non-owning handle to the field map, used by the dependency graph so
    /// its entries never extend this object's lifetime.
    pub(crate) fn weak_fields(&self) -> Weak<RwLock<FieldMap>> {
        Arc::downgrade(&self.fields)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ObjectRef {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            fields: Arc::clone(&self.fields),
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectRef {}

impl<K, V> FromIterator<(K, V)> for ObjectRef
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let obj = ObjectRef::new();
        {
            let mut fields = obj.fields.write();
            for (key, value) in iter {
                fields.insert(key.into(), value.into());
            }
        }
        obj
    }
}

impl std::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

/// Build an [`ObjectRef`] literal.
///
/// ```
/// use ripple_core::object;
///
/// let user = object! {
///     "name" => "ada",
///     "age" => 36,
/// };
/// assert_eq!(user.get("name").as_str(), Some("ada"));
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::reactive::ObjectRef::new()
    };
    ($($key:literal => $value:expr),+ $(,)?) => {{
        let obj = $crate::reactive::ObjectRef::new();
        $(obj.set($key, $crate::reactive::Value::from($value));)+
        obj
    }};
}
