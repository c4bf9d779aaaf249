//! Call-local scopes and the per-thread scope stack
//!
//! A `CallScope` exists for the duration of one bridged call: shared
//! variables are injected into it before dispatch and it is popped on every
//! exit path afterward. The stack is thread-local — push/pop never contend
//! with other host threads.

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use mica_core::Value;

/// A short-lived binding table created per bridged call.
#[derive(Default)]
pub struct CallScope {
    bindings: Mutex<FxHashMap<String, Value>>,
}

impl CallScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable in this scope.
    pub fn bind(&self, name: &str, value: Value) {
        self.bindings.lock().insert(name.to_string(), value);
    }

    /// Look up a binding.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.lock().get(name).cloned()
    }

    /// Names bound in this scope.
    pub fn names(&self) -> Vec<String> {
        self.bindings.lock().keys().cloned().collect()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.lock().len()
    }

    /// Check whether the scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.lock().is_empty()
    }
}

impl std::fmt::Debug for CallScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallScope").field("len", &self.len()).finish()
    }
}

/// A precomputed evaluation unit optionally carrying a reusable scope.
///
/// Callers that prepare a unit ahead of time can hand its scope to the
/// adapter instead of allocating a fresh one per call.
#[derive(Debug, Default)]
pub struct EvalUnit {
    scope: Option<Arc<CallScope>>,
}

impl EvalUnit {
    /// A unit with no precomputed scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// A unit carrying a precomputed scope.
    pub fn with_scope(scope: Arc<CallScope>) -> Self {
        Self { scope: Some(scope) }
    }

    /// The unit's scope, if it has one.
    pub fn scope(&self) -> Option<&Arc<CallScope>> {
        self.scope.as_ref()
    }
}

thread_local! {
    static SCOPE_STACK: RefCell<Vec<Arc<CallScope>>> = const { RefCell::new(Vec::new()) };
}

/// Push a scope and receive a guard that pops it when dropped.
///
/// The guard is the unconditional cleanup step: it fires on every exit path,
/// early returns and errors included.
pub fn enter(scope: Arc<CallScope>) -> ScopeGuard {
    SCOPE_STACK.with(|stack| stack.borrow_mut().push(scope));
    ScopeGuard { _private: () }
}

/// The active scope on this thread, if any.
pub fn current() -> Option<Arc<CallScope>> {
    SCOPE_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Depth of this thread's scope stack.
pub fn depth() -> usize {
    SCOPE_STACK.with(|stack| stack.borrow().len())
}

/// Pops the scope pushed by the matching [`enter`] on drop.
pub struct ScopeGuard {
    _private: (),
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl std::fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScopeGuard(depth={})", depth())
    }
}
