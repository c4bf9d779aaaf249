//! Host reflection boundary
//!
//! The bridge consumes reflective metadata supplied by the host platform; it
//! does not define reflection itself. Each member descriptor carries a
//! callable thunk, so binding generation is a deterministic function of the
//! descriptor list and needs no live reflective environment.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Reflective access to a single member failed.
///
/// Non-fatal during binding generation (the member is omitted); fatal only
/// when raised on the invocation path.
#[derive(Debug, Clone, thiserror::Error)]
#[error("reflective access to `{member}` failed: {reason}")]
pub struct AccessError {
    /// The member whose access failed
    pub member: String,
    /// Why access failed
    pub reason: String,
}

impl AccessError {
    /// Create an access error for a named member.
    pub fn new(member: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            reason: reason.into(),
        }
    }
}

/// An opaque, identity-comparable host object crossing the boundary.
#[derive(Clone)]
pub struct HostObject {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    /// Box a host value with its type name.
    pub fn new<T: Any + Send + Sync>(type_name: &str, value: T) -> Self {
        Self {
            type_name: Arc::from(type_name),
            inner: Arc::new(value),
        }
    }

    /// Host type name of the boxed value.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Downcast to the concrete host type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Identity comparison: same boxed host object, not structural equality.
    pub fn same_identity(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({})", self.type_name)
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

/// A statically-typed host value crossing the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// Host null/None
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Owned string
    Str(String),
    /// List of host values
    List(Vec<HostValue>),
    /// Opaque host object
    Object(HostObject),
    /// A guest value passing through host code unchanged
    Guest(Value),
}

impl HostValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Int(_) => "integer",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "string",
            HostValue::List(_) => "list",
            HostValue::Object(_) => "object",
            HostValue::Guest(_) => "guest",
        }
    }
}

/// Member access modifiers captured from host metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Static member
    pub is_static: bool,
    /// Final (non-reassignable) member
    pub is_final: bool,
    /// Accessible outside the declaring type
    pub is_public: bool,
}

impl Modifiers {
    /// `public static final`
    pub fn public_static_final() -> Self {
        Self {
            is_static: true,
            is_final: true,
            is_public: true,
        }
    }

    /// `public static`
    pub fn public_static() -> Self {
        Self {
            is_static: true,
            is_final: false,
            is_public: true,
        }
    }

    /// `public` instance member
    pub fn public_instance() -> Self {
        Self {
            is_static: false,
            is_final: false,
            is_public: true,
        }
    }
}

/// Thunk reading a host field's current value.
pub type FieldGetter = Arc<dyn Fn() -> Result<HostValue, AccessError> + Send + Sync>;

/// Thunk writing a host field.
pub type FieldSetter = Arc<dyn Fn(HostValue) -> Result<(), AccessError> + Send + Sync>;

/// Thunk invoking a host method with converted arguments.
pub type MethodThunk = Arc<dyn Fn(&[HostValue]) -> Result<HostValue, AccessError> + Send + Sync>;

/// Descriptor of a host field.
#[derive(Clone)]
pub struct HostField {
    /// Field name as declared on the host type
    pub name: String,
    /// Qualified path of the declaring type
    pub declared_by: String,
    /// Access modifiers
    pub modifiers: Modifiers,
    /// Declared type is eligible for constant exposure
    pub constant_eligible: bool,
    /// Live read of the field
    pub getter: FieldGetter,
    /// Live write, absent for final fields
    pub setter: Option<FieldSetter>,
}

impl fmt::Debug for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostField")
            .field("name", &self.name)
            .field("declared_by", &self.declared_by)
            .field("modifiers", &self.modifiers)
            .field("constant_eligible", &self.constant_eligible)
            .finish()
    }
}

/// Descriptor of a host method.
#[derive(Clone)]
pub struct HostMethod {
    /// Method name as declared on the host type
    pub name: String,
    /// Qualified path of the declaring type
    pub declared_by: String,
    /// Access modifiers
    pub modifiers: Modifiers,
    /// Declared return type is boolean
    pub returns_bool: bool,
    /// Declared parameter count
    pub arity: usize,
    /// Forwarding call into the host member
    pub invoke: MethodThunk,
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("name", &self.name)
            .field("declared_by", &self.declared_by)
            .field("modifiers", &self.modifiers)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Kind of host type being bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete or abstract class
    Class,
    /// Interface
    Interface,
}

/// Descriptor of a host class or interface. Immutable once captured.
#[derive(Debug, Clone)]
pub struct HostTypeDesc {
    /// Qualified host path, e.g. `com.example.Geometry$Shape`
    pub path: String,
    /// Class or interface
    pub kind: TypeKind,
    /// Declared fields (including inherited ones the host facility reports)
    pub fields: Vec<HostField>,
    /// Declared methods
    pub methods: Vec<HostMethod>,
    /// Module-style singleton companion methods attached by the host ecosystem
    pub companions: Vec<HostMethod>,
    /// Names of nested types declared on this type
    pub nested: Vec<String>,
}

impl HostTypeDesc {
    /// Create an empty class descriptor.
    pub fn class(path: impl Into<String>) -> Self {
        Self::with_kind(path, TypeKind::Class)
    }

    /// Create an empty interface descriptor.
    pub fn interface(path: impl Into<String>) -> Self {
        Self::with_kind(path, TypeKind::Interface)
    }

    fn with_kind(path: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            fields: Vec::new(),
            methods: Vec::new(),
            companions: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Unqualified type name (last path segment, outermost nested segment).
    pub fn simple_name(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or(&self.path);
        last.rsplit('$').next().unwrap_or(last)
    }
}
