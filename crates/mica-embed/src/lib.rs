//! Mica Embed — the host/guest embedding bridge
//!
//! Two subsystems:
//! - `binding` — the reflective binding generator: introspects a host type
//!   descriptor and synthesizes a guest-visible proxy exposing its accessible
//!   static members, constants and nested types.
//! - the embedding invocation layer (`session`, `adapter`, `convert`,
//!   `variable`, `scope`) — lets host code call guest methods, converts
//!   values across the boundary, and synchronizes a shared variable map
//!   between host and guest call frames.
//!
//! The guest evaluator itself is an external collaborator behind
//! [`mica_core::Evaluator`]; this crate never implements guest dispatch.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod binding;
pub mod convert;
pub mod scope;
pub mod session;
pub mod variable;

pub use adapter::{CallKind, ObjectAdapter};
pub use binding::{BindingRegistry, MemberInstaller, Proxy};
pub use convert::TargetType;
pub use scope::{CallScope, EvalUnit};
pub use session::EmbedSession;
pub use variable::{BridgedVariable, SharedVariableMap};
