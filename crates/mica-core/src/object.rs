//! Guest object model
//!
//! A `GuestObject` owns its instance-variable storage. The shared variable
//! map references (never owns) this storage and reconciles with it at call
//! boundaries, so reads between bridged calls must go through the map.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::value::Value;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// A guest object instance with named instance-variable storage.
pub struct GuestObject {
    id: u64,
    class_name: String,
    vars: Mutex<VarTable>,
}

#[derive(Default)]
struct VarTable {
    map: FxHashMap<String, Value>,
    order: Vec<String>,
}

impl GuestObject {
    /// Create a new guest object of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class_name: class_name.into(),
            vars: Mutex::new(VarTable::default()),
        }
    }

    /// Process-unique object identity.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Guest class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Set an instance variable, recording first-assignment order.
    pub fn set_var(&self, name: &str, value: Value) {
        let mut vars = self.vars.lock();
        if !vars.map.contains_key(name) {
            vars.order.push(name.to_string());
        }
        vars.map.insert(name.to_string(), value);
    }

    /// Read an instance variable.
    pub fn var(&self, name: &str) -> Option<Value> {
        self.vars.lock().map.get(name).cloned()
    }

    /// Remove an instance variable, returning its last value.
    pub fn remove_var(&self, name: &str) -> Option<Value> {
        let mut vars = self.vars.lock();
        let removed = vars.map.remove(name);
        if removed.is_some() {
            vars.order.retain(|n| n != name);
        }
        removed
    }

    /// Variable names in first-assignment order.
    pub fn var_names(&self) -> Vec<String> {
        self.vars.lock().order.clone()
    }

    /// Snapshot of all variables in first-assignment order.
    pub fn snapshot_vars(&self) -> Vec<(String, Value)> {
        let vars = self.vars.lock();
        vars.order
            .iter()
            .filter_map(|name| vars.map.get(name).map(|v| (name.clone(), v.clone())))
            .collect()
    }

    /// Number of instance variables.
    pub fn var_count(&self) -> usize {
        self.vars.lock().map.len()
    }
}

impl std::fmt::Debug for GuestObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestObject")
            .field("id", &self.id)
            .field("class_name", &self.class_name)
            .field("var_count", &self.var_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids_unique() {
        let a = GuestObject::new("Widget");
        let b = GuestObject::new("Widget");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_var_set_and_get() {
        let obj = GuestObject::new("Widget");
        assert_eq!(obj.var("x"), None);

        obj.set_var("x", Value::Int(5));
        assert_eq!(obj.var("x"), Some(Value::Int(5)));

        obj.set_var("x", Value::Int(6));
        assert_eq!(obj.var("x"), Some(Value::Int(6)));
        assert_eq!(obj.var_count(), 1);
    }

    #[test]
    fn test_var_names_keep_assignment_order() {
        let obj = GuestObject::new("Widget");
        obj.set_var("b", Value::Int(1));
        obj.set_var("a", Value::Int(2));
        obj.set_var("b", Value::Int(3));
        assert_eq!(obj.var_names(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_remove_var() {
        let obj = GuestObject::new("Widget");
        obj.set_var("x", Value::Int(5));
        assert_eq!(obj.remove_var("x"), Some(Value::Int(5)));
        assert_eq!(obj.var("x"), None);
        assert!(obj.var_names().is_empty());
        assert_eq!(obj.remove_var("x"), None);
    }
}
