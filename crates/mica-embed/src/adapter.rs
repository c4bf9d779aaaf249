//! Embedding invocation adapter
//!
//! Orchestrates a single cross-boundary call: scope injection, argument
//! conversion, dispatch to the external evaluator, error translation, scope
//! retrieval and result coercion. Every failure crossing the public surface
//! is the single uniform invocation-failure kind; guest-raised errors are
//! logged in their own representation first and never propagate in native
//! guest form.

use std::sync::Arc;

use mica_core::{Block, BridgeError, BridgeResult, GuestObject, HostValue, Value};

use crate::convert::{self, TargetType};
use crate::scope::{self, CallScope, EvalUnit};
use crate::session::EmbedSession;

/// Selects which guest-evaluator entry point an invocation uses.
///
/// The kind determines only the entry point; argument and result handling
/// is identical across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Method call with no arguments
    NoArg,
    /// Ordinary method call with arguments
    Args,
    /// Method call with arguments and a trailing block
    ArgsWithBlock,
    /// Superclass call
    Super,
    /// Superclass call with a trailing block
    SuperWithBlock,
}

/// Adapter for invoking guest methods from host code.
pub struct ObjectAdapter<'s> {
    session: &'s EmbedSession,
}

impl<'s> ObjectAdapter<'s> {
    /// Create an adapter over a session.
    pub fn new(session: &'s EmbedSession) -> Self {
        Self { session }
    }

    /// Core invocation state machine.
    ///
    /// With variable sharing enabled, a scope (the unit's precomputed one or
    /// a fresh allocation) is injected and pushed before dispatch and popped
    /// on every exit path; updates are retrieved from the receiver on
    /// success. With no requested return type the raw guest result is
    /// returned uncoerced.
    pub fn call(
        &self,
        kind: CallKind,
        return_type: Option<&TargetType>,
        receiver: Option<&Value>,
        method: Option<&str>,
        block: Option<&Block>,
        unit: Option<&EvalUnit>,
        args: &[HostValue],
    ) -> BridgeResult<HostValue> {
        let receiver = self.session.receiver_for(receiver);
        let sharing = self.session.sharing_variables();

        let _scope_guard = if sharing {
            let scope = match unit.and_then(EvalUnit::scope) {
                Some(scope) => scope.clone(),
                None => Arc::new(CallScope::new()),
            };
            self.session.var_map().inject(&scope);
            Some(scope::enter(scope))
        } else {
            None
        };

        let result = self
            .dispatch(kind, &receiver, method, block, args)
            .and_then(|value| {
                if sharing {
                    if let Value::Object(obj) = &receiver {
                        self.session.var_map().retrieve(obj);
                    }
                }
                convert::to_host(&value, return_type)
            });

        result.map_err(|err| match err {
            BridgeError::GuestRaised(guest) => {
                tracing::error!("{}", guest);
                BridgeError::InvocationFailed {
                    message: guest.message().to_string(),
                    source: Some(Box::new(BridgeError::GuestRaised(guest))),
                }
            }
            other => other.into_invocation_failure(),
        })
        // _scope_guard drops here: the scope is popped whether the call
        // succeeded or failed.
    }

    fn dispatch(
        &self,
        kind: CallKind,
        receiver: &Value,
        method: Option<&str>,
        block: Option<&Block>,
        args: &[HostValue],
    ) -> BridgeResult<Value> {
        let guest_args = convert::to_guest_args(args);
        let ev = self.session.evaluator();
        let result = match kind {
            CallKind::NoArg => ev.invoke_no_arg(receiver, required_method(method)?),
            CallKind::Args => ev.invoke(receiver, required_method(method)?, &guest_args),
            CallKind::ArgsWithBlock => ev.invoke_with_block(
                receiver,
                required_method(method)?,
                &guest_args,
                required_block(block)?,
            ),
            CallKind::Super => ev.invoke_super(receiver, &guest_args),
            CallKind::SuperWithBlock => {
                ev.invoke_super_with_block(receiver, &guest_args, required_block(block)?)
            }
        };
        result.map_err(BridgeError::GuestRaised)
    }

    /// Call a guest method, selecting the no-arg entry point when `args` is
    /// empty. Returns the raw guest result.
    pub fn call_method(
        &self,
        receiver: Option<&Value>,
        method: &str,
        args: &[HostValue],
    ) -> BridgeResult<HostValue> {
        self.call(kind_for(args), None, receiver, Some(method), None, None, args)
    }

    /// Call a guest method and coerce the result to a host target type.
    pub fn call_method_typed(
        &self,
        receiver: Option<&Value>,
        method: &str,
        args: &[HostValue],
        return_type: &TargetType,
    ) -> BridgeResult<HostValue> {
        self.call(
            kind_for(args),
            Some(return_type),
            receiver,
            Some(method),
            None,
            None,
            args,
        )
    }

    /// Call a guest method with a trailing block. Needs at least one
    /// argument.
    pub fn call_method_with_block(
        &self,
        receiver: Option<&Value>,
        method: &str,
        block: &Block,
        args: &[HostValue],
    ) -> BridgeResult<HostValue> {
        if args.is_empty() {
            return Err(BridgeError::invocation(
                "needs at least one argument in a block call",
            ));
        }
        self.call(
            CallKind::ArgsWithBlock,
            None,
            receiver,
            Some(method),
            Some(block),
            None,
            args,
        )
    }

    /// Call a guest method reusing a precomputed evaluation unit's scope.
    pub fn call_method_in_unit(
        &self,
        receiver: Option<&Value>,
        method: &str,
        args: &[HostValue],
        return_type: Option<&TargetType>,
        unit: &EvalUnit,
    ) -> BridgeResult<HostValue> {
        self.call(
            kind_for(args),
            return_type,
            receiver,
            Some(method),
            None,
            Some(unit),
            args,
        )
    }

    /// Superclass call from the receiver's current method.
    pub fn call_super(
        &self,
        receiver: &Value,
        args: &[HostValue],
        return_type: Option<&TargetType>,
    ) -> BridgeResult<HostValue> {
        self.call(
            CallKind::Super,
            return_type,
            Some(receiver),
            None,
            None,
            None,
            args,
        )
    }

    /// Superclass call with a trailing block.
    pub fn call_super_with_block(
        &self,
        receiver: &Value,
        args: &[HostValue],
        block: &Block,
        return_type: Option<&TargetType>,
    ) -> BridgeResult<HostValue> {
        self.call(
            CallKind::SuperWithBlock,
            return_type,
            Some(receiver),
            None,
            Some(block),
            None,
            args,
        )
    }

    /// Call a guest method on a host receiver, converting the receiver
    /// through the standard wrapping path first.
    pub fn run_guest_method(
        &self,
        return_type: Option<&TargetType>,
        receiver: &HostValue,
        method: &str,
        block: Option<&Block>,
        args: &[HostValue],
    ) -> BridgeResult<HostValue> {
        let guest_receiver = convert::to_guest(receiver);
        let kind = match block {
            Some(_) => CallKind::ArgsWithBlock,
            None => kind_for(args),
        };
        self.call(
            kind,
            return_type,
            Some(&guest_receiver),
            Some(method),
            block,
            None,
            args,
        )
    }

    /// Set a named variable on a receiver, tracking it in the shared map.
    ///
    /// An already-tracked variable is mutated in place; a new one is also
    /// written into the receiver's own storage immediately, so it is visible
    /// inside the next call without waiting for injection.
    pub fn set_instance_variable(&self, receiver: &Value, name: &str, value: Value) -> Value {
        let target = self.receiver_object(receiver);
        self.session.var_map().set(&target, name, value.clone());
        value
    }

    /// Read a shared variable. Only the map is consulted; untracked names
    /// return `None` even if the receiver's own storage has drifted.
    pub fn get_instance_variable(&self, _receiver: &Value, name: &str) -> Option<Value> {
        self.session.var_map().get(name)
    }

    /// Guest `kind_of?` check, delegated to the evaluator.
    pub fn is_kind_of(&self, value: &Value, module_name: &str) -> bool {
        self.session.evaluator().kind_of(value, module_name)
    }

    /// Clone a guest array's elements into a host-side vector.
    pub fn to_guest_array(&self, value: &Value) -> BridgeResult<Vec<Value>> {
        convert::guest_array_to_vec(value)
    }

    /// Coerce a guest value to a guest integer.
    pub fn to_guest_integer(&self, value: &Value) -> BridgeResult<Value> {
        convert::to_guest_integer(value)
    }

    /// Coerce a guest value to its guest string form.
    pub fn to_guest_string(&self, value: &Value) -> Value {
        convert::to_guest_string(value)
    }

    fn receiver_object(&self, receiver: &Value) -> Arc<GuestObject> {
        match receiver {
            Value::Object(obj) => obj.clone(),
            _ => self.session.top_self().clone(),
        }
    }
}

impl std::fmt::Debug for ObjectAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectAdapter").finish()
    }
}

fn kind_for(args: &[HostValue]) -> CallKind {
    if args.is_empty() {
        CallKind::NoArg
    } else {
        CallKind::Args
    }
}

fn required_method(method: Option<&str>) -> BridgeResult<&str> {
    method.ok_or_else(|| BridgeError::invocation("method name is required for this call kind"))
}

fn required_block(block: Option<&Block>) -> BridgeResult<&Block> {
    block.ok_or_else(|| BridgeError::invocation("a block is required for this call kind"))
}
