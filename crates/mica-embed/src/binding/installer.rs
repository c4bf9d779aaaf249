//! Member installer stubs
//!
//! Each installer holds enough metadata to construct a forwarding call from
//! the guest side to the underlying host member. An installer is installed
//! onto exactly one proxy; aliases within that proxy share the same
//! installer, but installers are never shared across proxies for different
//! host types.

use mica_core::{BridgeError, BridgeResult, HostField, HostMethod, Value};

use crate::convert;

/// A guest-callable stub for one host member.
#[derive(Debug, Clone)]
pub enum MemberInstaller {
    /// Forwarding caller for a static host method
    StaticMethod {
        /// The underlying method descriptor
        method: HostMethod,
    },
    /// A constant value snapshotted at install time
    ConstantValue {
        /// The converted guest value
        value: Value,
    },
    /// Live reader for a static host field
    FieldAccessor {
        /// The underlying field descriptor
        field: HostField,
        /// A constant of the same name shadows this accessor; reads warn
        /// that the accessor may diverge from the constant snapshot
        deprecated_shadowing: bool,
    },
    /// Live writer for a non-final static host field
    FieldMutator {
        /// The underlying field descriptor
        field: HostField,
    },
    /// A nested type exposed as a guest constant naming its qualified path
    NestedType {
        /// Qualified host path of the nested type
        type_name: String,
    },
    /// Accessor for an instance member, populated lazily on first instance
    /// use
    InstanceAccessor {
        /// The underlying method descriptor
        method: HostMethod,
    },
}

impl MemberInstaller {
    /// Invoke the stub with guest arguments.
    pub fn invoke(&self, name: &str, args: &[Value]) -> BridgeResult<Value> {
        match self {
            MemberInstaller::StaticMethod { method }
            | MemberInstaller::InstanceAccessor { method } => {
                let host_args: Vec<_> = args.iter().map(convert::to_host_arg).collect();
                let result = (method.invoke)(&host_args)?;
                Ok(convert::to_guest(&result))
            }
            MemberInstaller::ConstantValue { value } => Ok(value.clone()),
            MemberInstaller::FieldAccessor {
                field,
                deprecated_shadowing,
            } => {
                if *deprecated_shadowing {
                    tracing::warn!(
                        member = %field.name,
                        "accessor shadows a constant and may diverge from its snapshot"
                    );
                }
                let result = (field.getter)()?;
                Ok(convert::to_guest(&result))
            }
            MemberInstaller::FieldMutator { field } => {
                let Some(arg) = args.first() else {
                    return Err(BridgeError::invocation(format!(
                        "setter `{}` needs a value",
                        name
                    )));
                };
                let Some(setter) = &field.setter else {
                    return Err(BridgeError::invocation(format!(
                        "field `{}` is not writable",
                        field.name
                    )));
                };
                setter(convert::to_host_arg(arg))?;
                // Assignment evaluates to the assigned value.
                Ok(arg.clone())
            }
            MemberInstaller::NestedType { type_name } => Ok(Value::str(type_name)),
        }
    }

    /// The constant value this member resolves to without a call, if any.
    pub fn constant_value(&self) -> Option<Value> {
        match self {
            MemberInstaller::ConstantValue { value } => Some(value.clone()),
            MemberInstaller::NestedType { type_name } => Some(Value::str(type_name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mica_core::{AccessError, HostValue, Modifiers};
    use parking_lot::Mutex;

    #[test]
    fn test_static_method_stub_converts_both_ways() {
        let method = HostMethod {
            name: "double".to_string(),
            declared_by: "com.example.Math".to_string(),
            modifiers: Modifiers::public_static(),
            returns_bool: false,
            arity: 1,
            invoke: Arc::new(|args| match args {
                [HostValue::Int(i)] => Ok(HostValue::Int(i * 2)),
                _ => Err(AccessError::new("double", "bad arguments")),
            }),
        };
        let stub = MemberInstaller::StaticMethod { method };
        assert_eq!(stub.invoke("double", &[Value::Int(21)]).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_access_failure_surfaces_as_reflective_error() {
        let method = HostMethod {
            name: "broken".to_string(),
            declared_by: "com.example.Math".to_string(),
            modifiers: Modifiers::public_static(),
            returns_bool: false,
            arity: 0,
            invoke: Arc::new(|_| Err(AccessError::new("broken", "inaccessible"))),
        };
        let stub = MemberInstaller::StaticMethod { method };
        let err = stub.invoke("broken", &[]).unwrap_err();
        assert!(matches!(err, BridgeError::ReflectiveAccess(_)));
    }

    #[test]
    fn test_field_accessor_reads_live_value() {
        let cell = Arc::new(Mutex::new(7i64));
        let read = cell.clone();
        let field = HostField {
            name: "counter".to_string(),
            declared_by: "com.example.Limits".to_string(),
            modifiers: Modifiers::public_static(),
            constant_eligible: true,
            getter: Arc::new(move || Ok(HostValue::Int(*read.lock()))),
            setter: None,
        };
        let stub = MemberInstaller::FieldAccessor {
            field,
            deprecated_shadowing: false,
        };

        assert_eq!(stub.invoke("counter", &[]).unwrap(), Value::Int(7));
        *cell.lock() = 8;
        // Not cached: external mutation is visible on the next read.
        assert_eq!(stub.invoke("counter", &[]).unwrap(), Value::Int(8));
    }

    #[test]
    fn test_field_mutator_writes_through() {
        let cell = Arc::new(Mutex::new(0i64));
        let write = cell.clone();
        let field = HostField {
            name: "counter".to_string(),
            declared_by: "com.example.Limits".to_string(),
            modifiers: Modifiers::public_static(),
            constant_eligible: true,
            getter: Arc::new(|| Ok(HostValue::Null)),
            setter: Some(Arc::new(move |value| match value {
                HostValue::Int(i) => {
                    *write.lock() = i;
                    Ok(())
                }
                other => Err(AccessError::new("counter", other.type_name())),
            })),
        };
        let stub = MemberInstaller::FieldMutator { field };

        let result = stub.invoke("counter=", &[Value::Int(5)]).unwrap();
        assert_eq!(result, Value::Int(5));
        assert_eq!(*cell.lock(), 5);

        assert!(stub.invoke("counter=", &[]).is_err());
    }

    #[test]
    fn test_constant_and_nested_values() {
        let constant = MemberInstaller::ConstantValue {
            value: Value::Int(1024),
        };
        assert_eq!(constant.constant_value(), Some(Value::Int(1024)));
        assert_eq!(constant.invoke("MAX_SIZE", &[]).unwrap(), Value::Int(1024));

        let nested = MemberInstaller::NestedType {
            type_name: "com.example.Geometry$Shape".to_string(),
        };
        assert_eq!(
            nested.constant_value(),
            Some(Value::str("com.example.Geometry$Shape"))
        );
    }
}
