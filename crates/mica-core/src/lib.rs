//! Mica Core — value and object model for the embedding bridge
//!
//! This crate provides the types shared by both sides of the host/guest
//! boundary:
//! - Guest dynamic values and objects
//! - The external guest evaluator boundary (trait)
//! - The host reflection boundary (type/member descriptors)
//! - The bridge error taxonomy

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod eval;
pub mod host;
pub mod object;
pub mod value;

pub use error::{BridgeError, BridgeResult};
pub use eval::{Block, Evaluator, GuestError};
pub use host::{
    AccessError, HostField, HostMethod, HostObject, HostTypeDesc, HostValue, Modifiers, TypeKind,
};
pub use object::GuestObject;
pub use value::{HostRef, Value};
