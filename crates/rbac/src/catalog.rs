//! Permission catalog with module grouping.
//!
//! The catalog is a pure read: fetched once per editing session and kept
//! only for the lifetime of that session.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use warden_core::PermissionId;

use crate::model::Permission;

/// Bucket name for permissions that have no owning module.
pub const UNASSIGNED_MODULE: &str = "unassigned";

/// The full set of assignable permissions, indexed by ID.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    by_id: HashMap<PermissionId, Permission>,
}

/// One display group: a module name and its permissions.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleGroup {
    pub module: String,
    pub permissions: Vec<Permission>,
}

impl PermissionCatalog {
    pub fn new(permissions: Vec<Permission>) -> Self {
        let by_id = permissions.into_iter().map(|p| (p.id, p)).collect();
        Self { by_id }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &PermissionId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &PermissionId) -> Option<&Permission> {
        self.by_id.get(id)
    }

    /// All catalog IDs; every ID in a computed `to_add` must come from here.
    pub fn ids(&self) -> HashSet<PermissionId> {
        self.by_id.keys().copied().collect()
    }

    /// All permissions, ordered by name.
    pub fn all(&self) -> Vec<&Permission> {
        let mut perms: Vec<&Permission> = self.by_id.values().collect();
        perms.sort_by(|a, b| a.name.cmp(&b.name));
        perms
    }

    /// Group the catalog by module name for display.
    ///
    /// Groups are ordered alphabetically by module name with the
    /// unassigned bucket last; permissions within a group are ordered by
    /// name so the output is deterministic.
    pub fn grouped_by_module(&self) -> Vec<ModuleGroup> {
        let mut groups: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        let mut unassigned: Vec<Permission> = Vec::new();

        for perm in self.by_id.values() {
            match perm.module_name.as_deref() {
                Some(name) if !name.trim().is_empty() => {
                    groups.entry(name.to_string()).or_default().push(perm.clone());
                }
                _ => unassigned.push(perm.clone()),
            }
        }

        let mut out: Vec<ModuleGroup> = groups
            .into_iter()
            .map(|(module, mut permissions)| {
                permissions.sort_by(|a, b| a.name.cmp(&b.name));
                ModuleGroup {
                    module,
                    permissions,
                }
            })
            .collect();

        if !unassigned.is_empty() {
            unassigned.sort_by(|a, b| a.name.cmp(&b.name));
            out.push(ModuleGroup {
                module: UNASSIGNED_MODULE.to_string(),
                permissions: unassigned,
            });
        }

        out
    }
}
