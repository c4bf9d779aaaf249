//! Bridge error taxonomy
//!
//! Guest errors cross the boundary as data, never in their native guest
//! form. The public invocation surface exposes a single uniform failure
//! kind; the wrapping step lives here so every caller applies it the same
//! way.

use crate::eval::GuestError;
use crate::host::AccessError;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised by the embedding bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Value could not be coerced to or from the guest representation
    #[error("cannot convert {from} to {to}: {reason}")]
    Conversion {
        /// Source type name
        from: String,
        /// Requested target type name
        to: String,
        /// Why coercion failed
        reason: String,
    },

    /// Member introspection failed
    #[error(transparent)]
    ReflectiveAccess(#[from] AccessError),

    /// The guest evaluator signaled a guest-level exception
    #[error("guest exception: {0}")]
    GuestRaised(GuestError),

    /// The single uniform failure surfaced to callers of the invocation path
    #[error("method invocation failed: {message}")]
    InvocationFailed {
        /// Human-readable failure description
        message: String,
        /// The underlying bridge error, if any
        #[source]
        source: Option<Box<BridgeError>>,
    },
}

impl BridgeError {
    /// Build a conversion error.
    pub fn conversion(
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BridgeError::Conversion {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Build an invocation failure with no underlying cause.
    pub fn invocation(message: impl Into<String>) -> Self {
        BridgeError::InvocationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Uniform wrapping at the public invocation boundary.
    ///
    /// An existing `InvocationFailed` passes through unchanged — never
    /// double-wrapped.
    pub fn into_invocation_failure(self) -> Self {
        match self {
            err @ BridgeError::InvocationFailed { .. } => err,
            other => BridgeError::InvocationFailed {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Check whether this is the uniform invocation failure kind.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(self, BridgeError::InvocationFailed { .. })
    }
}
