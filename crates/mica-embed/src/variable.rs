//! Shared variable map
//!
//! Variables shared across the boundary live in one lock-guarded table.
//! The guest object's own storage keeps an independently-mutable copy that
//! is reconciled with the table only at call boundaries: `inject` before a
//! bridged call, `retrieve` after it. Between calls the table is
//! authoritative and must be read through, not around.
//!
//! Setting a variable is asymmetric by design: the new value is written
//! through to the target object's own storage immediately, so a variable set
//! before a call is visible inside that same call without waiting for
//! injection. Reads only reconcile at call boundaries.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use mica_core::{GuestObject, Value};

use crate::scope::CallScope;

/// A variable kept consistent between host-side and guest-side storage.
///
/// Cells are shared; mutation happens in place so existing references keep
/// observing the current value.
pub struct BridgedVariable {
    name: String,
    receiver_id: u64,
    value: Mutex<Value>,
}

impl BridgedVariable {
    fn new(name: &str, receiver_id: u64, value: Value) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            receiver_id,
            value: Mutex::new(value),
        })
    }

    /// Variable name shared with the guest.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the receiver the variable originated on.
    pub fn receiver_id(&self) -> u64 {
        self.receiver_id
    }

    /// Current guest-side value.
    pub fn value(&self) -> Value {
        self.value.lock().clone()
    }

    /// Replace the value in place, preserving cell identity.
    pub fn set_value(&self, value: Value) {
        *self.value.lock() = value;
    }
}

impl std::fmt::Debug for BridgedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgedVariable")
            .field("name", &self.name)
            .field("receiver_id", &self.receiver_id)
            .field("value", &self.value())
            .finish()
    }
}

#[derive(Default)]
struct VarMapInner {
    map: FxHashMap<String, Arc<BridgedVariable>>,
    order: Vec<String>,
}

/// Session-scoped table of bridged variables, guarded by a single lock.
///
/// The lock is held only for table lookups and copies, never across a guest
/// call, so a slow call blocks only work that interleaves with its
/// injection/retrieval windows.
#[derive(Default)]
pub struct SharedVariableMap {
    inner: Mutex<VarMapInner>,
}

impl SharedVariableMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named variable on a receiver.
    ///
    /// An already-tracked variable is mutated in place; a new one is created
    /// and also written into the receiver's own storage immediately.
    pub fn set(&self, receiver: &GuestObject, name: &str, value: Value) {
        {
            let mut inner = self.inner.lock();
            match inner.map.get(name) {
                Some(cell) => cell.set_value(value.clone()),
                None => {
                    let cell = BridgedVariable::new(name, receiver.id(), value.clone());
                    inner.map.insert(name.to_string(), cell);
                    inner.order.push(name.to_string());
                }
            }
        }
        // Write-through happens outside the map lock; receiver storage has
        // its own lock and the two are never nested.
        receiver.set_var(name, value);
    }

    /// Current value of a tracked variable.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.lock().map.get(name).map(|cell| cell.value())
    }

    /// The tracked variable cell itself.
    pub fn variable(&self, name: &str) -> Option<Arc<BridgedVariable>> {
        self.inner.lock().map.get(name).cloned()
    }

    /// Check whether a name is tracked.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().map.contains_key(name)
    }

    /// Stop tracking a variable, returning its cell.
    pub fn remove(&self, name: &str) -> Option<Arc<BridgedVariable>> {
        let mut inner = self.inner.lock();
        let removed = inner.map.remove(name);
        if removed.is_some() {
            inner.order.retain(|n| n != name);
        }
        removed
    }

    /// Copy every tracked variable into a call-local scope under its
    /// guest-visible name.
    pub fn inject(&self, scope: &CallScope) {
        let inner = self.inner.lock();
        for name in &inner.order {
            if let Some(cell) = inner.map.get(name) {
                scope.bind(name, cell.value());
            }
        }
    }

    /// Walk the receiver's live variable storage after a call and update or
    /// create entries for any new or changed names.
    pub fn retrieve(&self, receiver: &GuestObject) {
        // Snapshot receiver storage before taking the map lock; the two
        // locks are never held together.
        let snapshot = receiver.snapshot_vars();
        let mut inner = self.inner.lock();
        for (name, value) in snapshot {
            match inner.map.get(&name) {
                Some(cell) => {
                    if cell.value() != value {
                        cell.set_value(value);
                    }
                }
                None => {
                    let cell = BridgedVariable::new(&name, receiver.id(), value);
                    inner.map.insert(name.clone(), cell);
                    inner.order.push(name);
                }
            }
        }
    }

    /// Tracked names in first-tracking order.
    pub fn names(&self) -> Vec<String> {
        self.inner.lock().order.clone()
    }

    /// Number of tracked variables.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Check whether no variables are tracked.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().map.is_empty()
    }

    /// Drop all tracked variables.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
    }
}

impl std::fmt::Debug for SharedVariableMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedVariableMap")
            .field("len", &self.len())
            .finish()
    }
}
