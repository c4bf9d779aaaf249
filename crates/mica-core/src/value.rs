//! Guest dynamic values
//!
//! `Value` is the representation every guest-side computation produces and
//! consumes. Reference variants (arrays, objects, host wrappers) are shared
//! handles; equality for them is identity, not structure.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::host::HostObject;
use crate::object::GuestObject;

/// A dynamically-typed guest value.
#[derive(Clone)]
pub enum Value {
    /// The guest nil/null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Mutable shared array
    Array(Arc<Mutex<Vec<Value>>>),
    /// Guest object instance
    Object(Arc<GuestObject>),
    /// Wrapped host object (always exactly one wrapping layer)
    HostRef(HostRef),
}

/// Guest-side wrapper around a host object.
///
/// The converter guarantees a single wrapping layer: wrapping an already
/// wrapped value goes back through the standard wrapping path instead of
/// nesting.
#[derive(Clone)]
pub struct HostRef {
    object: HostObject,
}

impl HostRef {
    /// Wrap a host object.
    pub fn new(object: HostObject) -> Self {
        Self { object }
    }

    /// The wrapped host object.
    pub fn object(&self) -> &HostObject {
        &self.object
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostRef({})", self.object.type_name())
    }
}

impl PartialEq for HostRef {
    fn eq(&self, other: &Self) -> bool {
        self.object.same_identity(&other.object)
    }
}

impl Value {
    /// Build a string value from a `&str`.
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// Build an array value from elements.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(Mutex::new(items)))
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Guest truthiness: everything except `null` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::HostRef(_) => "host",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::HostRef(a), Value::HostRef(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Array(arr) => write!(f, "Array(len={})", arr.lock().len()),
            Value::Object(obj) => write!(f, "Object({}#{})", obj.class_name(), obj.id()),
            Value::HostRef(r) => write!(f, "{:?}", r),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.lock().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => write!(f, "#<{}:{}>", obj.class_name(), obj.id()),
            Value::HostRef(r) => write!(f, "#<Host:{}>", r.object().type_name()),
        }
    }
}
