//! RBAC read models as served by the backend.
//!
//! These are immutable from the console's perspective within one editing
//! session; mutation happens through explicit API calls followed by a
//! re-fetch of authoritative state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{ModuleId, PermissionId, RoleId, UserId};

/// An atomic grantable capability, owned by a module, assignable to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub description: String,
    /// Owning module; permissions without one are grouped under the
    /// unassigned bucket for display.
    pub module_id: Option<ModuleId>,
    pub module_name: Option<String>,
    pub active: bool,
}

/// A grouping/label for permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub description: String,
    pub active: bool,
}

/// A named bundle of permissions, assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    pub active: bool,
    /// Order-irrelevant set of assigned permissions.
    pub permissions: Vec<PermissionId>,
}

/// A user account with its role assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub roles: Vec<RoleId>,
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: uuid::Uuid,
    /// Event kind (e.g. "user.created", "role.permission_granted").
    pub event: String,
    pub actor: String,
    pub module: String,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}
