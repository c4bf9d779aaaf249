//! Member classification pass
//!
//! Walks a host type descriptor once and partitions its members into
//! constants, static field accessors, static methods and nested types.
//! Pure function of the descriptor: the installation pass can be driven by
//! synthetic member lists in tests.

use mica_core::{HostField, HostMethod, HostTypeDesc};

/// A field exposed as a direct constant.
#[derive(Debug, Clone)]
pub struct ConstantField {
    /// The underlying static final field
    pub field: HostField,
}

/// A static field exposed through paired accessor methods.
#[derive(Debug, Clone)]
pub struct StaticFieldMember {
    /// The underlying static field
    pub field: HostField,
    /// A constant of the same name exists; the accessor may diverge from
    /// the constant snapshot and reads should warn
    pub shadows_constant: bool,
}

/// A static method to install as a caller stub.
#[derive(Debug, Clone)]
pub struct StaticMethodMember {
    /// The underlying static method
    pub method: HostMethod,
    /// Came from a module-style singleton companion rather than the type
    /// itself
    pub companion: bool,
}

/// Output of one classification pass over a host type.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedMembers {
    /// Constant fields, in declaration order
    pub constants: Vec<ConstantField>,
    /// Static fields to expose through accessors, in declaration order
    pub static_accessors: Vec<StaticFieldMember>,
    /// Static methods (type-declared first, then companions)
    pub static_methods: Vec<StaticMethodMember>,
    /// Nested type names declared on this type
    pub nested: Vec<String>,
}

/// Classify a host type's members for installation.
///
/// Inherited members are excluded so each type in a hierarchy installs only
/// its own declarations. A constant field is not duplicated: the same
/// descriptor drives both its constant and its accessor roles.
pub fn classify(desc: &HostTypeDesc) -> ClassifiedMembers {
    let mut members = ClassifiedMembers::default();

    for field in &desc.fields {
        if field.declared_by != desc.path || !field.modifiers.is_public {
            continue;
        }
        let is_constant = field.modifiers.is_static
            && field.modifiers.is_final
            && field.constant_eligible;
        if is_constant {
            members.constants.push(ConstantField {
                field: field.clone(),
            });
        }
        if field.modifiers.is_static {
            members.static_accessors.push(StaticFieldMember {
                field: field.clone(),
                shadows_constant: is_constant,
            });
        }
    }

    for method in &desc.methods {
        if method.declared_by != desc.path || !method.modifiers.is_public {
            continue;
        }
        // Interfaces surface only their static (default-companion) methods;
        // classes install statics through the same path.
        if !method.modifiers.is_static {
            continue;
        }
        members.static_methods.push(StaticMethodMember {
            method: method.clone(),
            companion: false,
        });
    }

    // Module-style singleton companions go through the same pipeline as
    // ordinary static methods.
    for method in &desc.companions {
        if !method.modifiers.is_public {
            continue;
        }
        members.static_methods.push(StaticMethodMember {
            method: method.clone(),
            companion: true,
        });
    }

    members.nested = desc.nested.clone();

    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mica_core::{HostValue, Modifiers};

    fn field(
        name: &str,
        declared_by: &str,
        modifiers: Modifiers,
        constant_eligible: bool,
    ) -> HostField {
        HostField {
            name: name.to_string(),
            declared_by: declared_by.to_string(),
            modifiers,
            constant_eligible,
            getter: Arc::new(|| Ok(HostValue::Int(0))),
            setter: None,
        }
    }

    fn method(name: &str, declared_by: &str, modifiers: Modifiers) -> HostMethod {
        HostMethod {
            name: name.to_string(),
            declared_by: declared_by.to_string(),
            modifiers,
            returns_bool: false,
            arity: 0,
            invoke: Arc::new(|_| Ok(HostValue::Null)),
        }
    }

    #[test]
    fn test_constant_also_gets_shadowing_accessor() {
        let mut desc = HostTypeDesc::class("com.example.Limits");
        desc.fields.push(field(
            "MAX_SIZE",
            "com.example.Limits",
            Modifiers::public_static_final(),
            true,
        ));
        desc.fields.push(field(
            "counter",
            "com.example.Limits",
            Modifiers::public_static(),
            true,
        ));

        let members = classify(&desc);
        assert_eq!(members.constants.len(), 1);
        assert_eq!(members.constants[0].field.name, "MAX_SIZE");

        assert_eq!(members.static_accessors.len(), 2);
        assert!(members.static_accessors[0].shadows_constant);
        assert!(!members.static_accessors[1].shadows_constant);
    }

    #[test]
    fn test_inherited_members_excluded() {
        let mut desc = HostTypeDesc::class("com.example.Child");
        desc.fields.push(field(
            "BASE",
            "com.example.Parent",
            Modifiers::public_static_final(),
            true,
        ));
        desc.methods
            .push(method("inherited", "com.example.Parent", Modifiers::public_static()));

        let members = classify(&desc);
        assert!(members.constants.is_empty());
        assert!(members.static_accessors.is_empty());
        assert!(members.static_methods.is_empty());
    }

    #[test]
    fn test_non_public_members_excluded() {
        let mut desc = HostTypeDesc::class("com.example.Widget");
        let mut private_static = Modifiers::public_static();
        private_static.is_public = false;
        desc.fields
            .push(field("hidden", "com.example.Widget", private_static, true));

        let members = classify(&desc);
        assert!(members.constants.is_empty());
        assert!(members.static_accessors.is_empty());
    }

    #[test]
    fn test_interface_keeps_only_static_methods() {
        let mut desc = HostTypeDesc::interface("com.example.Shape");
        desc.methods
            .push(method("area", "com.example.Shape", Modifiers::public_instance()));
        desc.methods
            .push(method("unitSquare", "com.example.Shape", Modifiers::public_static()));

        let members = classify(&desc);
        assert_eq!(members.static_methods.len(), 1);
        assert_eq!(members.static_methods[0].method.name, "unitSquare");
    }

    #[test]
    fn test_companions_append_through_same_pipeline() {
        let mut desc = HostTypeDesc::class("com.example.Widget");
        desc.methods
            .push(method("create", "com.example.Widget", Modifiers::public_static()));
        desc.companions
            .push(method("default", "com.example.Widget$", Modifiers::public_static()));

        let members = classify(&desc);
        assert_eq!(members.static_methods.len(), 2);
        assert!(!members.static_methods[0].companion);
        assert!(members.static_methods[1].companion);
    }

    #[test]
    fn test_nested_types_collected() {
        let mut desc = HostTypeDesc::class("com.example.Geometry");
        desc.nested.push("Shape".to_string());
        let members = classify(&desc);
        assert_eq!(members.nested, vec!["Shape".to_string()]);
    }
}
