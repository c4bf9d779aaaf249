//! Embedding session
//!
//! One `EmbedSession` per embedded guest runtime: it holds the evaluator
//! handle, the shared variable map, the top-level receiver and the
//! session-wide variable-sharing flag. Adapters borrow the session; multiple
//! host threads may call through it concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mica_core::{Evaluator, GuestObject, Value};

use crate::adapter::ObjectAdapter;
use crate::variable::SharedVariableMap;

/// The embedding container for one guest runtime.
pub struct EmbedSession {
    evaluator: Arc<dyn Evaluator>,
    var_map: SharedVariableMap,
    top_self: Arc<GuestObject>,
    sharing_variables: AtomicBool,
}

impl EmbedSession {
    /// Create a session around an external evaluator. Variable sharing
    /// starts disabled.
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            var_map: SharedVariableMap::new(),
            top_self: Arc::new(GuestObject::new("Object")),
            sharing_variables: AtomicBool::new(false),
        }
    }

    /// Enable or disable variable sharing for the whole session.
    pub fn set_sharing_variables(&self, enabled: bool) {
        self.sharing_variables.store(enabled, Ordering::SeqCst);
    }

    /// Whether variable sharing is enabled.
    pub fn sharing_variables(&self) -> bool {
        self.sharing_variables.load(Ordering::SeqCst)
    }

    /// The session's shared variable map.
    pub fn var_map(&self) -> &SharedVariableMap {
        &self.var_map
    }

    /// The external guest evaluator.
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// The top-level guest receiver.
    pub fn top_self(&self) -> &Arc<GuestObject> {
        &self.top_self
    }

    /// Create an invocation adapter over this session.
    pub fn adapter(&self) -> ObjectAdapter<'_> {
        ObjectAdapter::new(self)
    }

    /// Resolve the receiver for a call: an absent receiver falls back to the
    /// top-level object.
    pub(crate) fn receiver_for(&self, receiver: Option<&Value>) -> Value {
        match receiver {
            Some(value) => value.clone(),
            None => Value::Object(self.top_self.clone()),
        }
    }
}

impl std::fmt::Debug for EmbedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedSession")
            .field("sharing_variables", &self.sharing_variables())
            .field("tracked_variables", &self.var_map.len())
            .finish()
    }
}
