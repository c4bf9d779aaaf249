//! Guest-visible proxy for a host type
//!
//! A proxy owns its installed members in two tables: constants (direct
//! values, nested types) and static members (caller and accessor stubs).
//! The tables are separate namespaces, so a constant-shaped field can carry
//! both its snapshot constant and a live, deprecated-shadowing accessor
//! under the same name.
//!
//! The display name is finalized only after all installation steps
//! complete — the generator forces the lazy computation as its last act, so
//! nothing observes a partial member set through the name.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use mica_core::{BridgeError, BridgeResult, Value};

use super::installer::MemberInstaller;

/// Name-keyed installer table with install order preserved.
#[derive(Default)]
pub(crate) struct MemberTable {
    map: FxHashMap<String, Arc<MemberInstaller>>,
    order: Vec<String>,
}

impl MemberTable {
    pub(crate) fn insert(&mut self, name: String, member: Arc<MemberInstaller>) {
        if !self.map.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.map.insert(name, member);
    }

    fn get(&self, name: &str) -> Option<Arc<MemberInstaller>> {
        self.map.get(name).cloned()
    }
}

/// The guest-visible module generated for one host type.
pub struct Proxy {
    host_path: String,
    display_name: OnceCell<String>,
    constants: RwLock<MemberTable>,
    statics: RwLock<MemberTable>,
    instance: RwLock<MemberTable>,
}

impl Proxy {
    pub(crate) fn new(host_path: &str) -> Self {
        Self {
            host_path: host_path.to_string(),
            display_name: OnceCell::new(),
            constants: RwLock::new(MemberTable::default()),
            statics: RwLock::new(MemberTable::default()),
            instance: RwLock::new(MemberTable::default()),
        }
    }

    /// Qualified path of the bound host type.
    pub fn host_path(&self) -> &str {
        &self.host_path
    }

    /// Guest display name, computed lazily on first query.
    ///
    /// `com.example.Geometry$Shape` renders as `Geometry::Shape`. Must not
    /// be queried before installation finishes; the generator forces it at
    /// the end of every pass.
    pub fn display_name(&self) -> &str {
        self.display_name
            .get_or_init(|| guest_display_name(&self.host_path))
    }

    /// Look up an installed static member stub.
    pub fn member(&self, name: &str) -> Option<Arc<MemberInstaller>> {
        self.statics.read().get(name)
    }

    /// Check whether a static member is installed.
    pub fn has_member(&self, name: &str) -> bool {
        self.statics.read().map.contains_key(name)
    }

    /// Installed static member names, in install order.
    pub fn member_names(&self) -> Vec<String> {
        self.statics.read().order.clone()
    }

    /// Number of installed static members.
    pub fn member_count(&self) -> usize {
        self.statics.read().map.len()
    }

    /// Read a constant (or nested-type) value without a call.
    pub fn constant(&self, name: &str) -> Option<Value> {
        self.constants
            .read()
            .get(name)
            .and_then(|m| m.constant_value())
    }

    /// Installed constant names, in install order.
    pub fn constant_names(&self) -> Vec<String> {
        self.constants.read().order.clone()
    }

    /// Call a static member stub with guest arguments.
    pub fn call_static(&self, name: &str, args: &[Value]) -> BridgeResult<Value> {
        match self.member(name) {
            Some(member) => member.invoke(name, args),
            None => Err(BridgeError::invocation(format!(
                "undefined member `{}` on {}",
                name, self.host_path
            ))),
        }
    }

    /// Look up a lazily-populated instance member.
    pub fn instance_member(&self, name: &str) -> Option<Arc<MemberInstaller>> {
        self.instance.read().get(name)
    }

    /// Populate one instance member on first instance use.
    pub fn install_instance_member(&self, name: &str, member: MemberInstaller) {
        self.instance
            .write()
            .insert(name.to_string(), Arc::new(member));
    }

    /// Swap in fully built tables, replacing all prior members.
    pub(crate) fn replace_members(&self, constants: MemberTable, statics: MemberTable) {
        *self.constants.write() = constants;
        *self.statics.write() = statics;
    }

    /// Drop instance members so they are recomputed lazily after rebinding.
    pub(crate) fn clear_instance_members(&self) {
        *self.instance.write() = MemberTable::default();
    }
}

impl std::fmt::Debug for Proxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("host_path", &self.host_path)
            .field("constants", &self.constants.read().map.len())
            .field("members", &self.member_count())
            .finish()
    }
}

fn guest_display_name(host_path: &str) -> String {
    let last = host_path.rsplit('.').next().unwrap_or(host_path);
    last.replace('$', "::")
}
