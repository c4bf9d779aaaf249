//! Binding generation
//!
//! `BindingRegistry::initialize` is the single-pass entry point: classify
//! the host type's members, resolve their guest names, build a fresh
//! `BindingState`, then swap the completed tables into the proxy. Re-running
//! fully replaces previously installed bindings — partial state from an
//! aborted pass never leaks, because nothing touches the proxy until the
//! state is complete.
//!
//! Reflective access failures on individual members are swallowed per
//! member: the member is omitted and generation continues.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use mica_core::HostTypeDesc;

use super::classify::classify;
use super::installer::MemberInstaller;
use super::names::{self, AssignedName, MemberKind};
use super::proxy::{MemberTable, Proxy};
use crate::convert;

/// Per-type working set built during one generation pass.
///
/// Owned exclusively by the generator for the duration of the pass and
/// merged into the proxy's permanent tables at the end.
#[derive(Default)]
struct BindingState {
    constants: MemberTable,
    statics: MemberTable,
    static_names: FxHashMap<String, AssignedName>,
    alias_queue: Vec<(Arc<MemberInstaller>, String, MemberKind, Vec<String>)>,
}

impl BindingState {
    /// First free guest name: the base itself, or a numbered alias when a
    /// distinct member already took it.
    fn claim(&self, base: &str) -> String {
        if !self.static_names.contains_key(base) {
            base.to_string()
        } else {
            names::numbered_alias(|n| self.static_names.contains_key(n), base)
        }
    }

    fn add_constant(&mut self, name: &str, member: MemberInstaller) {
        self.constants.insert(name.to_string(), Arc::new(member));
    }

    fn add_static(
        &mut self,
        original: &str,
        kind: MemberKind,
        guest: String,
        member: Arc<MemberInstaller>,
        aliases: Vec<String>,
    ) {
        let installed = self.claim(&guest);
        self.static_names.insert(
            installed.clone(),
            AssignedName {
                original: original.to_string(),
                guest: installed.clone(),
                kind,
            },
        );
        self.statics.insert(installed, member.clone());
        if !aliases.is_empty() {
            self.alias_queue
                .push((member, original.to_string(), kind, aliases));
        }
    }

    /// Re-install every multiply-resolved member under its alias names.
    fn assign_aliases(&mut self) {
        let queue = std::mem::take(&mut self.alias_queue);
        for (member, original, kind, aliases) in queue {
            for alias in aliases {
                let installed = self.claim(&alias);
                self.static_names.insert(
                    installed.clone(),
                    AssignedName {
                        original: original.clone(),
                        guest: installed.clone(),
                        kind,
                    },
                );
                self.statics.insert(installed, member.clone());
            }
        }
    }
}

/// Process-wide registry of generated proxies and assigned-name caches.
///
/// Explicit state passed by reference, never implicit global lookup. The
/// caches live from the first binding of a host type and are replaced only
/// on explicit rebinding.
#[derive(Default)]
pub struct BindingRegistry {
    proxies: DashMap<String, Arc<Proxy>>,
    static_names: DashMap<String, FxHashMap<String, AssignedName>>,
    instance_names: DashMap<String, FxHashMap<String, AssignedName>>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate (or fully regenerate) the proxy for a host type.
    pub fn initialize(&self, desc: &HostTypeDesc) -> Arc<Proxy> {
        let members = classify(desc);
        let mut state = BindingState::default();

        // Constants snapshot their value at install time; an inaccessible
        // member is omitted, never fatal for the rest of the proxy.
        for c in &members.constants {
            let guest = names::resolve(&c.field.name, MemberKind::Constant);
            match (c.field.getter)() {
                Ok(value) => state.add_constant(
                    &guest,
                    MemberInstaller::ConstantValue {
                        value: convert::to_guest(&value),
                    },
                ),
                Err(err) => {
                    tracing::debug!(member = %c.field.name, "skipping inaccessible constant: {err}");
                }
            }
        }

        for fm in &members.static_accessors {
            let reader = names::resolve(&fm.field.name, MemberKind::Field);
            let aliases = names::alias_names(&fm.field.name, &reader);
            let accessor = Arc::new(MemberInstaller::FieldAccessor {
                field: fm.field.clone(),
                deprecated_shadowing: fm.shadows_constant,
            });
            state.add_static(&fm.field.name, MemberKind::Field, reader.clone(), accessor, aliases);

            if !fm.field.modifiers.is_final && fm.field.setter.is_some() {
                let mutator = Arc::new(MemberInstaller::FieldMutator {
                    field: fm.field.clone(),
                });
                state.add_static(
                    &fm.field.name,
                    MemberKind::Field,
                    format!("{}=", reader),
                    mutator,
                    Vec::new(),
                );
            }
        }

        for mm in &members.static_methods {
            let kind = MemberKind::Method {
                returns_bool: mm.method.returns_bool,
            };
            let guest = names::resolve(&mm.method.name, kind);
            let aliases = names::alias_names(&mm.method.name, &guest);
            let stub = Arc::new(MemberInstaller::StaticMethod {
                method: mm.method.clone(),
            });
            state.add_static(&mm.method.name, kind, guest, stub, aliases);
        }

        state.assign_aliases();

        // Nested types install as constants naming their qualified path.
        for nested in &members.nested {
            state.add_constant(
                nested,
                MemberInstaller::NestedType {
                    type_name: format!("{}${}", desc.path, nested),
                },
            );
        }

        // Replace the assigned-name caches: statics take this pass's names,
        // instance names are cleared for lazy recomputation on first
        // instance use.
        self.static_names
            .insert(desc.path.clone(), state.static_names.clone());
        self.instance_names.remove(&desc.path);

        let proxy = self
            .proxies
            .entry(desc.path.clone())
            .or_insert_with(|| Arc::new(Proxy::new(&desc.path)))
            .clone();
        proxy.replace_members(state.constants, state.statics);
        proxy.clear_instance_members();

        // Trigger lazy name finalization now that installation is done.
        let _ = proxy.display_name();

        proxy
    }

    /// The proxy previously generated for a host type, if any.
    pub fn proxy(&self, host_path: &str) -> Option<Arc<Proxy>> {
        self.proxies.get(host_path).map(|entry| entry.clone())
    }

    /// Static name assignments recorded by the last generation pass.
    pub fn static_assigned_names(&self, host_path: &str) -> FxHashMap<String, AssignedName> {
        self.static_names
            .get(host_path)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Record an instance name assignment during lazy instance binding.
    pub fn record_instance_name(&self, host_path: &str, assigned: AssignedName) {
        self.instance_names
            .entry(host_path.to_string())
            .or_default()
            .insert(assigned.guest.clone(), assigned);
    }

    /// Instance name assignments made since the last (re)binding.
    pub fn instance_assigned_names(&self, host_path: &str) -> FxHashMap<String, AssignedName> {
        self.instance_names
            .get(host_path)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Number of bound host types.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Check whether no host types are bound.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("bound_types", &self.len())
            .finish()
    }
}
