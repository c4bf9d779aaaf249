//! Value conversion across the host/guest boundary
//!
//! `to_guest` and `to_host` are the only paths values take across the
//! boundary. Host objects always cross as a single `HostRef` wrapping layer:
//! converting a value that is already a guest-side wrapper goes back through
//! the standard wrapping path instead of nesting, so
//! `unwrap_host_object(to_guest(x))` returns `x` itself for any host object.

use mica_core::{BridgeError, BridgeResult, HostObject, HostRef, HostValue, Value};

/// Coercion hint for converting a guest value back to a host value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    /// Caller does not want a value; converts to `HostValue::Null`
    Unit,
    /// Host boolean
    Bool,
    /// Host 64-bit integer
    Int,
    /// Host 64-bit float
    Float,
    /// Host string (guest display form of any value)
    Str,
    /// Host list, with an optional element hint
    List(Option<Box<TargetType>>),
    /// Unwrapped host object
    Object,
}

impl TargetType {
    fn name(&self) -> &'static str {
        match self {
            TargetType::Unit => "unit",
            TargetType::Bool => "boolean",
            TargetType::Int => "integer",
            TargetType::Float => "float",
            TargetType::Str => "string",
            TargetType::List(_) => "list",
            TargetType::Object => "object",
        }
    }
}

/// Wrap a host object for the guest side.
///
/// This is the single standard wrapping path; every host object the guest
/// sees goes through it, regardless of input origin.
pub fn wrap_host_object(object: &HostObject) -> Value {
    Value::HostRef(HostRef::new(object.clone()))
}

/// Unwrap a guest-side host wrapper back to the host object.
pub fn unwrap_host_object(value: &Value) -> Option<HostObject> {
    match value {
        Value::HostRef(r) => Some(r.object().clone()),
        _ => None,
    }
}

/// Convert a host value to a guest value.
pub fn to_guest(value: &HostValue) -> Value {
    match value {
        HostValue::Null => Value::Null,
        HostValue::Bool(b) => Value::Bool(*b),
        HostValue::Int(i) => Value::Int(*i),
        HostValue::Float(x) => Value::Float(*x),
        HostValue::Str(s) => Value::str(s),
        HostValue::List(items) => Value::array(items.iter().map(to_guest).collect()),
        HostValue::Object(obj) => wrap_host_object(obj),
        // A guest value passing through host code: already-wrapped host
        // objects are re-wrapped through the standard path, never nested.
        HostValue::Guest(v) => match v {
            Value::HostRef(r) => wrap_host_object(r.object()),
            other => other.clone(),
        },
    }
}

/// Convert an argument array element-wise.
pub fn to_guest_args(args: &[HostValue]) -> Vec<Value> {
    args.iter().map(to_guest).collect()
}

/// Convert a guest value back to a host value.
///
/// With no target type the raw guest value is returned without coercion.
/// With a target the value is coerced, raising a typed conversion error —
/// distinct from invocation errors — on mismatch.
pub fn to_host(value: &Value, target: Option<&TargetType>) -> BridgeResult<HostValue> {
    let Some(target) = target else {
        return Ok(HostValue::Guest(value.clone()));
    };

    match target {
        TargetType::Unit => Ok(HostValue::Null),
        TargetType::Bool => match value {
            Value::Bool(b) => Ok(HostValue::Bool(*b)),
            other => Err(mismatch(other, target, "not a boolean")),
        },
        TargetType::Int => match value {
            Value::Int(i) => Ok(HostValue::Int(*i)),
            Value::Float(x) if x.fract() == 0.0 => Ok(HostValue::Int(*x as i64)),
            other => Err(mismatch(other, target, "not an integral number")),
        },
        TargetType::Float => match value {
            Value::Float(x) => Ok(HostValue::Float(*x)),
            Value::Int(i) => Ok(HostValue::Float(*i as f64)),
            other => Err(mismatch(other, target, "not a number")),
        },
        TargetType::Str => Ok(HostValue::Str(value.to_string())),
        TargetType::List(elem) => match value {
            Value::Array(items) => {
                let items = items.lock().clone();
                let mut out = Vec::with_capacity(items.len());
                for item in &items {
                    out.push(to_host(item, elem.as_deref())?);
                }
                Ok(HostValue::List(out))
            }
            other => Err(mismatch(other, target, "not an array")),
        },
        TargetType::Object => unwrap_host_object(value)
            .map(HostValue::Object)
            .ok_or_else(|| mismatch(value, target, "not a wrapped host object")),
    }
}

/// Lower a guest value to the natural host representation.
///
/// Used by proxy forwarding stubs, where no caller-supplied target type
/// exists: primitives map directly, wrappers unwrap, guest objects pass
/// through boxed.
pub fn to_host_arg(value: &Value) -> HostValue {
    match value {
        Value::Null => HostValue::Null,
        Value::Bool(b) => HostValue::Bool(*b),
        Value::Int(i) => HostValue::Int(*i),
        Value::Float(x) => HostValue::Float(*x),
        Value::Str(s) => HostValue::Str(s.to_string()),
        Value::Array(items) => HostValue::List(items.lock().iter().map(to_host_arg).collect()),
        Value::HostRef(r) => HostValue::Object(r.object().clone()),
        other => HostValue::Guest(other.clone()),
    }
}

/// Clone a guest array's elements into a plain vector.
pub fn guest_array_to_vec(value: &Value) -> BridgeResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.lock().clone()),
        other => Err(BridgeError::conversion(
            other.type_name(),
            "array",
            "not an array",
        )),
    }
}

/// Coerce a guest value to a guest integer.
pub fn to_guest_integer(value: &Value) -> BridgeResult<Value> {
    match value {
        Value::Int(_) => Ok(value.clone()),
        Value::Float(x) => Ok(Value::Int(*x as i64)),
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            BridgeError::conversion("string", "integer", format!("`{}` is not numeric", s))
        }),
        other => Err(BridgeError::conversion(
            other.type_name(),
            "integer",
            "no integer form",
        )),
    }
}

/// Coerce a guest value to its guest string form.
pub fn to_guest_string(value: &Value) -> Value {
    match value {
        Value::Str(_) => value.clone(),
        other => Value::str(&other.to_string()),
    }
}

fn mismatch(value: &Value, target: &TargetType, reason: &str) -> BridgeError {
    BridgeError::conversion(value.type_name(), target.name(), reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_guest_primitives() {
        assert_eq!(to_guest(&HostValue::Null), Value::Null);
        assert_eq!(to_guest(&HostValue::Bool(true)), Value::Bool(true));
        assert_eq!(to_guest(&HostValue::Int(42)), Value::Int(42));
        assert_eq!(to_guest(&HostValue::Float(3.5)), Value::Float(3.5));
        assert_eq!(to_guest(&HostValue::Str("hi".into())), Value::str("hi"));
    }

    #[test]
    fn test_to_guest_list_elementwise() {
        let list = HostValue::List(vec![HostValue::Int(1), HostValue::Str("two".into())]);
        let guest = to_guest(&list);
        let items = guest_array_to_vec(&guest).unwrap();
        assert_eq!(items, vec![Value::Int(1), Value::str("two")]);
    }

    #[test]
    fn test_single_wrapping_layer() {
        let host = HostObject::new("com.example.Widget", 7i64);
        let wrapped = to_guest(&HostValue::Object(host.clone()));

        // Passing the already-wrapped value back through conversion re-wraps
        // via the standard path: still one layer, same identity underneath.
        let rewrapped = to_guest(&HostValue::Guest(wrapped.clone()));
        let unwrapped = unwrap_host_object(&rewrapped).unwrap();
        assert!(unwrapped.same_identity(&host));

        let list = HostValue::List(vec![HostValue::Guest(wrapped)]);
        let guest_list = to_guest(&list);
        let items = guest_array_to_vec(&guest_list).unwrap();
        let element = unwrap_host_object(&items[0]).unwrap();
        assert!(element.same_identity(&host));
    }

    #[test]
    fn test_guest_passthrough() {
        let obj = Value::array(vec![Value::Int(1)]);
        let through = to_guest(&HostValue::Guest(obj.clone()));
        assert_eq!(through, obj);
    }

    #[test]
    fn test_to_host_without_target_is_raw() {
        let v = Value::str("payload");
        match to_host(&v, None).unwrap() {
            HostValue::Guest(raw) => assert_eq!(raw, v),
            other => panic!("expected raw guest value, got {:?}", other),
        }
    }

    #[test]
    fn test_to_host_coercions() {
        assert_eq!(
            to_host(&Value::Int(5), Some(&TargetType::Float)).unwrap(),
            HostValue::Float(5.0)
        );
        assert_eq!(
            to_host(&Value::Float(5.0), Some(&TargetType::Int)).unwrap(),
            HostValue::Int(5)
        );
        assert_eq!(
            to_host(&Value::Int(5), Some(&TargetType::Str)).unwrap(),
            HostValue::Str("5".into())
        );
        assert_eq!(
            to_host(&Value::Int(5), Some(&TargetType::Unit)).unwrap(),
            HostValue::Null
        );
    }

    #[test]
    fn test_to_host_failure_is_conversion_error() {
        let err = to_host(&Value::str("abc"), Some(&TargetType::Int)).unwrap_err();
        assert!(matches!(err, BridgeError::Conversion { .. }));
        assert!(!err.is_invocation_failure());
    }

    #[test]
    fn test_to_host_list_with_element_hint() {
        let arr = Value::array(vec![Value::Int(1), Value::Float(2.0)]);
        let host = to_host(
            &arr,
            Some(&TargetType::List(Some(Box::new(TargetType::Int)))),
        )
        .unwrap();
        assert_eq!(host, HostValue::List(vec![HostValue::Int(1), HostValue::Int(2)]));
    }

    #[test]
    fn test_to_host_object_unwraps() {
        let host = HostObject::new("com.example.Widget", "w".to_string());
        let wrapped = wrap_host_object(&host);
        match to_host(&wrapped, Some(&TargetType::Object)).unwrap() {
            HostValue::Object(obj) => assert!(obj.same_identity(&host)),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_to_guest_integer() {
        assert_eq!(to_guest_integer(&Value::Int(3)).unwrap(), Value::Int(3));
        assert_eq!(to_guest_integer(&Value::Float(3.9)).unwrap(), Value::Int(3));
        assert_eq!(to_guest_integer(&Value::str(" 12 ")).unwrap(), Value::Int(12));
        assert!(to_guest_integer(&Value::str("twelve")).is_err());
        assert!(to_guest_integer(&Value::Null).is_err());
    }

    #[test]
    fn test_to_guest_string() {
        assert_eq!(to_guest_string(&Value::Int(3)), Value::str("3"));
        assert_eq!(to_guest_string(&Value::str("s")), Value::str("s"));
    }
}
