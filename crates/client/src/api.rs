//! Typed endpoints of the Warden backend.
//!
//! [`AdminApi`] is the seam the console programs against; [`ApiClient`]
//! implements it over HTTP. Tests substitute an in-memory fake.

use serde::{Deserialize, Serialize};

use warden_core::{ListFilter, ModuleId, PageRequest, Paginated, PermissionId, RoleId, UserId};
use warden_rbac::{AuditEvent, Module, NewPermissionRecord, NewUserRecord, Permission, Role, User};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// The target of a permission assignment edit.
///
/// Role editing and user editing share the reconciler and commit path; the
/// owner only decides which endpoints receive the grant/revoke calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssignmentOwner {
    Role(RoleId),
    UserRole { user: UserId, role: RoleId },
}

impl AssignmentOwner {
    fn base_path(&self) -> String {
        match self {
            AssignmentOwner::Role(role) => format!("/roles/{role}"),
            AssignmentOwner::UserRole { user, role } => format!("/users/{user}/roles/{role}"),
        }
    }
}

impl core::fmt::Display for AssignmentOwner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AssignmentOwner::Role(role) => write!(f, "role {role}"),
            AssignmentOwner::UserRole { user, role } => write!(f, "user {user} / role {role}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub active: bool,
    pub roles: Vec<RoleId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
    pub roles: Option<Vec<RoleId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModule {
    pub name: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateModule {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Output flavor of a generated report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

/// Payload of the report generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub filter: ListFilter,
    pub format: ReportFormat,
    pub requested_by: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// API surface
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the console needs from the backend.
pub trait AdminApi: Send + Sync {
    /// Full permission catalog.
    fn permission_catalog(&self) -> impl Future<Output = ClientResult<Vec<Permission>>> + Send;

    /// Permission IDs currently granted to the owner.
    fn owner_permissions(
        &self,
        owner: &AssignmentOwner,
    ) -> impl Future<Output = ClientResult<Vec<PermissionId>>> + Send;

    /// Grant one permission to the owner (idempotent-or-error on duplicate).
    fn grant_permission(
        &self,
        owner: &AssignmentOwner,
        permission: PermissionId,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Revoke one permission from the owner (idempotent-or-error if absent).
    fn revoke_permission(
        &self,
        owner: &AssignmentOwner,
        permission: PermissionId,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn list_users(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> impl Future<Output = ClientResult<Paginated<User>>> + Send;

    fn create_user(&self, input: &NewUser) -> impl Future<Output = ClientResult<User>> + Send;

    fn update_user(
        &self,
        id: UserId,
        input: &UpdateUser,
    ) -> impl Future<Output = ClientResult<User>> + Send;

    fn list_roles(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> impl Future<Output = ClientResult<Paginated<Role>>> + Send;

    fn create_role(&self, input: &NewRole) -> impl Future<Output = ClientResult<Role>> + Send;

    fn update_role(
        &self,
        id: RoleId,
        input: &UpdateRole,
    ) -> impl Future<Output = ClientResult<Role>> + Send;

    fn list_modules(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> impl Future<Output = ClientResult<Paginated<Module>>> + Send;

    fn create_module(&self, input: &NewModule) -> impl Future<Output = ClientResult<Module>> + Send;

    fn update_module(
        &self,
        id: ModuleId,
        input: &UpdateModule,
    ) -> impl Future<Output = ClientResult<Module>> + Send;

    fn list_audit(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> impl Future<Output = ClientResult<Paginated<AuditEvent>>> + Send;

    /// Bulk-create users from validated spreadsheet records.
    fn fast_charge_users(
        &self,
        records: &[NewUserRecord],
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Bulk-create permissions from validated spreadsheet records.
    fn fast_charge_permissions(
        &self,
        records: &[NewPermissionRecord],
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Generate a report; the returned blob is opaque (PDF or spreadsheet).
    fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> impl Future<Output = ClientResult<Vec<u8>>> + Send;
}

fn list_query(page: PageRequest, filter: &ListFilter) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.page.to_string()),
        ("page_size", page.page_size.to_string()),
    ];
    query.extend(filter.query_pairs());
    query
}

impl AdminApi for ApiClient {
    async fn permission_catalog(&self) -> ClientResult<Vec<Permission>> {
        self.get_json("/permissions", &[]).await
    }

    async fn owner_permissions(&self, owner: &AssignmentOwner) -> ClientResult<Vec<PermissionId>> {
        self.get_json(&format!("{}/permissions", owner.base_path()), &[])
            .await
    }

    async fn grant_permission(
        &self,
        owner: &AssignmentOwner,
        permission: PermissionId,
    ) -> ClientResult<()> {
        self.post_empty(&format!("{}/permissions/{}", owner.base_path(), permission))
            .await
    }

    async fn revoke_permission(
        &self,
        owner: &AssignmentOwner,
        permission: PermissionId,
    ) -> ClientResult<()> {
        self.delete(&format!("{}/permissions/{}", owner.base_path(), permission))
            .await
    }

    async fn list_users(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> ClientResult<Paginated<User>> {
        self.get_json("/users", &list_query(page, filter)).await
    }

    async fn create_user(&self, input: &NewUser) -> ClientResult<User> {
        self.post_json("/users", input).await
    }

    async fn update_user(&self, id: UserId, input: &UpdateUser) -> ClientResult<User> {
        self.put_json(&format!("/users/{id}"), input).await
    }

    async fn list_roles(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> ClientResult<Paginated<Role>> {
        self.get_json("/roles", &list_query(page, filter)).await
    }

    async fn create_role(&self, input: &NewRole) -> ClientResult<Role> {
        self.post_json("/roles", input).await
    }

    async fn update_role(&self, id: RoleId, input: &UpdateRole) -> ClientResult<Role> {
        self.put_json(&format!("/roles/{id}"), input).await
    }

    async fn list_modules(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> ClientResult<Paginated<Module>> {
        self.get_json("/modules", &list_query(page, filter)).await
    }

    async fn create_module(&self, input: &NewModule) -> ClientResult<Module> {
        self.post_json("/modules", input).await
    }

    async fn update_module(&self, id: ModuleId, input: &UpdateModule) -> ClientResult<Module> {
        self.put_json(&format!("/modules/{id}"), input).await
    }

    async fn list_audit(
        &self,
        page: PageRequest,
        filter: &ListFilter,
    ) -> ClientResult<Paginated<AuditEvent>> {
        self.get_json("/audit", &list_query(page, filter)).await
    }

    async fn fast_charge_users(&self, records: &[NewUserRecord]) -> ClientResult<()> {
        self.post_unit("/fastcharge/users", records).await
    }

    async fn fast_charge_permissions(&self, records: &[NewPermissionRecord]) -> ClientResult<()> {
        self.post_unit("/fastcharge/permissions", records).await
    }

    async fn generate_report(&self, request: &ReportRequest) -> ClientResult<Vec<u8>> {
        self.post_bytes("/reports", request).await
    }
}
