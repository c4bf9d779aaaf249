//! Guest evaluator boundary
//!
//! The evaluator/dispatcher is an external collaborator: it receives an
//! already-resolved method name and converted guest arguments, and returns a
//! raw guest value or a guest-level error. The bridge only selects which
//! entry point to use; it never implements guest dispatch itself.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A guest-level exception signaled by the evaluator.
#[derive(Debug, Clone)]
pub struct GuestError {
    class_name: String,
    message: String,
    backtrace: Vec<String>,
}

impl GuestError {
    /// Create a guest error with a class name and message.
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: message.into(),
            backtrace: Vec::new(),
        }
    }

    /// Attach guest backtrace lines.
    pub fn with_backtrace(mut self, backtrace: Vec<String>) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// Guest exception class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Guest exception message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Guest backtrace lines, outermost first.
    pub fn backtrace(&self) -> &[String] {
        &self.backtrace
    }
}

impl fmt::Display for GuestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class_name, self.message)?;
        for line in &self.backtrace {
            write!(f, "\n\tfrom {}", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for GuestError {}

/// A host-supplied closure passed to the guest as a block.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn(&[Value]) -> Result<Value, GuestError> + Send + Sync>);

impl Block {
    /// Wrap a host closure as a guest-callable block.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, GuestError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the block with guest arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, GuestError> {
        (self.0)(args)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block")
    }
}

/// The external guest evaluator.
///
/// Five entry points keyed by call kind. Each accepts a resolved receiver,
/// converted guest arguments and (where applicable) a block, and returns one
/// guest value or a guest-level error.
pub trait Evaluator: Send + Sync {
    /// Ordinary method call with arguments.
    fn invoke(&self, receiver: &Value, method: &str, args: &[Value]) -> Result<Value, GuestError>;

    /// Method call with no arguments.
    fn invoke_no_arg(&self, receiver: &Value, method: &str) -> Result<Value, GuestError>;

    /// Method call with arguments and a trailing block.
    fn invoke_with_block(
        &self,
        receiver: &Value,
        method: &str,
        args: &[Value],
        block: &Block,
    ) -> Result<Value, GuestError>;

    /// Superclass call from the receiver's current method.
    fn invoke_super(&self, receiver: &Value, args: &[Value]) -> Result<Value, GuestError>;

    /// Superclass call with a trailing block.
    fn invoke_super_with_block(
        &self,
        receiver: &Value,
        args: &[Value],
        block: &Block,
    ) -> Result<Value, GuestError>;

    /// Guest `kind_of?` semantics: is `value` an instance of the named
    /// guest module/class?
    fn kind_of(&self, value: &Value, module_name: &str) -> bool;
}
