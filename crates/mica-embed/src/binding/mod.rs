//! Reflective binding generation
//!
//! Turns a host type descriptor into a guest-visible proxy in two phases: a
//! pure classification pass over the descriptor's members, then an
//! installation pass that is a deterministic function of the classified
//! list. No live reflective environment is needed — member descriptors
//! carry their own forwarding thunks.

pub mod classify;
pub mod generator;
pub mod installer;
pub mod names;
pub mod proxy;

pub use classify::{classify, ClassifiedMembers};
pub use generator::BindingRegistry;
pub use installer::MemberInstaller;
pub use names::{AssignedName, MemberKind};
pub use proxy::Proxy;
