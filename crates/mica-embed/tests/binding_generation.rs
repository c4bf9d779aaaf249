//! Integration tests for reflective binding generation
//!
//! Drives the generator with synthetic host type descriptors: no live
//! reflective environment is involved, only descriptor lists with callable
//! thunks.

use std::sync::Arc;

use parking_lot::Mutex;

use mica_core::{AccessError, HostField, HostMethod, HostTypeDesc, HostValue, Modifiers, Value};
use mica_embed::BindingRegistry;

fn constant_field(declared_by: &str, name: &str, value: i64) -> HostField {
    HostField {
        name: name.to_string(),
        declared_by: declared_by.to_string(),
        modifiers: Modifiers::public_static_final(),
        constant_eligible: true,
        getter: Arc::new(move || Ok(HostValue::Int(value))),
        setter: None,
    }
}

fn mutable_field(declared_by: &str, name: &str, cell: Arc<Mutex<i64>>) -> HostField {
    let read = cell.clone();
    let write = cell;
    HostField {
        name: name.to_string(),
        declared_by: declared_by.to_string(),
        modifiers: Modifiers::public_static(),
        constant_eligible: true,
        getter: Arc::new(move || Ok(HostValue::Int(*read.lock()))),
        setter: Some(Arc::new(move |value| match value {
            HostValue::Int(i) => {
                *write.lock() = i;
                Ok(())
            }
            other => Err(AccessError::new("field", other.type_name())),
        })),
    }
}

fn static_method(declared_by: &str, name: &str, marker: i64) -> HostMethod {
    HostMethod {
        name: name.to_string(),
        declared_by: declared_by.to_string(),
        modifiers: Modifiers::public_static(),
        returns_bool: false,
        arity: 0,
        invoke: Arc::new(move |_| Ok(HostValue::Int(marker))),
    }
}

#[test]
fn test_constants_and_accessors() {
    let path = "com.example.Limits";
    let counter = Arc::new(Mutex::new(7i64));

    let mut desc = HostTypeDesc::class(path);
    desc.fields.push(constant_field(path, "MAX_SIZE", 1024));
    desc.fields.push(mutable_field(path, "counter", counter.clone()));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    // Direct constant.
    assert_eq!(proxy.constant("MAX_SIZE"), Some(Value::Int(1024)));

    // Paired accessors for the non-final static field.
    assert_eq!(proxy.call_static("counter", &[]).unwrap(), Value::Int(7));
    assert_eq!(
        proxy.call_static("counter=", &[Value::Int(9)]).unwrap(),
        Value::Int(9)
    );
    assert_eq!(*counter.lock(), 9);

    // The accessor is not cached: an external mutation is visible.
    *counter.lock() = 21;
    assert_eq!(proxy.call_static("counter", &[]).unwrap(), Value::Int(21));
}

#[test]
fn test_constant_accessor_shadows_snapshot() {
    let path = "com.example.Limits";
    let mut desc = HostTypeDesc::class(path);
    desc.fields.push(constant_field(path, "MAX_SIZE", 1024));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    // The constant is a snapshot; the shadowing accessor reads live through
    // the getter and stays callable under the same name.
    assert_eq!(proxy.constant("MAX_SIZE"), Some(Value::Int(1024)));
    assert_eq!(proxy.call_static("MAX_SIZE", &[]).unwrap(), Value::Int(1024));
    // Final field: no mutator installed.
    assert!(!proxy.has_member("MAX_SIZE="));
}

#[test]
fn test_binding_is_idempotent() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);
    desc.fields.push(constant_field(path, "VERSION", 3));
    desc.methods.push(static_method(path, "getName", 1));
    desc.methods.push(static_method(path, "name", 2));

    let registry = BindingRegistry::new();
    let first = registry.initialize(&desc);
    let first_members = first.member_names();
    let first_constants = first.constant_names();

    let second = registry.initialize(&desc);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.member_names(), first_members);
    assert_eq!(second.constant_names(), first_constants);
}

#[test]
fn test_colliding_members_both_stay_callable() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);
    // Both resolve to guest name `name`.
    desc.methods.push(static_method(path, "getName", 1));
    desc.methods.push(static_method(path, "name", 2));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    // First-discovered wins the plain name; the later one is installed as a
    // numbered alias, never dropped.
    assert_eq!(proxy.call_static("name", &[]).unwrap(), Value::Int(1));
    assert_eq!(proxy.call_static("name2", &[]).unwrap(), Value::Int(2));
    // The accessor-shaped method stays reachable under its literal spelling.
    assert_eq!(proxy.call_static("get_name", &[]).unwrap(), Value::Int(1));
}

#[test]
fn test_accessor_prefix_resolution() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);
    desc.methods.push(static_method(path, "setTitle", 1));
    let mut empty = static_method(path, "isEmpty", 2);
    empty.returns_bool = true;
    desc.methods.push(empty);

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    assert_eq!(proxy.call_static("title=", &[]).unwrap(), Value::Int(1));
    assert_eq!(proxy.call_static("empty?", &[]).unwrap(), Value::Int(2));
    assert_eq!(proxy.call_static("is_empty", &[]).unwrap(), Value::Int(2));
}

#[test]
fn test_inaccessible_member_is_skipped_not_fatal() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);

    let mut broken = constant_field(path, "BROKEN", 0);
    broken.getter = Arc::new(|| Err(AccessError::new("BROKEN", "not exported")));
    desc.fields.push(broken);
    desc.fields.push(constant_field(path, "OK", 5));
    desc.methods.push(static_method(path, "works", 7));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    assert_eq!(proxy.constant("BROKEN"), None);
    assert_eq!(proxy.constant("OK"), Some(Value::Int(5)));
    assert_eq!(proxy.call_static("works", &[]).unwrap(), Value::Int(7));
}

#[test]
fn test_nested_types_and_display_name() {
    let path = "com.example.Geometry$Shape";
    let mut desc = HostTypeDesc::class(path);
    desc.nested.push("Corner".to_string());

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    assert_eq!(proxy.display_name(), "Geometry::Shape");
    assert_eq!(
        proxy.constant("Corner"),
        Some(Value::str("com.example.Geometry$Shape$Corner"))
    );
}

#[test]
fn test_interface_surfaces_only_static_methods() {
    let path = "com.example.Measurable";
    let mut desc = HostTypeDesc::interface(path);

    let mut area = static_method(path, "area", 1);
    area.modifiers = Modifiers::public_instance();
    desc.methods.push(area);
    desc.methods.push(static_method(path, "unitSquare", 2));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    assert!(!proxy.has_member("area"));
    assert_eq!(proxy.call_static("unit_square", &[]).unwrap(), Value::Int(2));
}

#[test]
fn test_companion_methods_install_like_statics() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);
    desc.companions.push(static_method(path, "defaultWidget", 11));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);

    assert_eq!(
        proxy.call_static("default_widget", &[]).unwrap(),
        Value::Int(11)
    );
}

#[test]
fn test_rebinding_replaces_name_caches() {
    let path = "com.example.Widget";
    let mut desc = HostTypeDesc::class(path);
    desc.methods.push(static_method(path, "getName", 1));

    let registry = BindingRegistry::new();
    let proxy = registry.initialize(&desc);
    assert!(registry.static_assigned_names(path).contains_key("name"));

    // Lazy instance binding records names between passes.
    registry.record_instance_name(
        path,
        mica_embed::binding::AssignedName {
            original: "getSize".to_string(),
            guest: "size".to_string(),
            kind: mica_embed::binding::MemberKind::Method {
                returns_bool: false,
            },
        },
    );
    proxy.install_instance_member(
        "size",
        mica_embed::MemberInstaller::ConstantValue {
            value: Value::Int(0),
        },
    );
    assert_eq!(registry.instance_assigned_names(path).len(), 1);

    // A descriptor that dropped the method: rebinding fully replaces the
    // caches and clears lazily-populated instance state.
    let fresh = HostTypeDesc::class(path);
    let rebound = registry.initialize(&fresh);
    assert!(registry.static_assigned_names(path).is_empty());
    assert!(registry.instance_assigned_names(path).is_empty());
    assert!(rebound.instance_member("size").is_none());
    assert!(!rebound.has_member("name"));
}

#[test]
fn test_registry_tracks_bound_types() {
    let registry = BindingRegistry::new();
    assert!(registry.is_empty());

    registry.initialize(&HostTypeDesc::class("com.example.A"));
    registry.initialize(&HostTypeDesc::class("com.example.B"));
    assert_eq!(registry.len(), 2);
    assert!(registry.proxy("com.example.A").is_some());
    assert!(registry.proxy("com.example.C").is_none());
}
