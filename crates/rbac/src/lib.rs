//! `warden-rbac` — pure RBAC domain layer for the admin console.
//!
//! This crate is intentionally decoupled from HTTP and storage: models,
//! the assignment reconciler, catalog grouping, and batch validation are
//! all deterministic and IO-free.

pub mod catalog;
pub mod claims;
pub mod import;
pub mod model;
pub mod reconcile;
pub mod routes;

pub use catalog::{ModuleGroup, PermissionCatalog, UNASSIGNED_MODULE};
pub use claims::{Claims, ClaimsValidationError, validate_claims};
pub use import::{
    BatchValidationError, NewPermissionRecord, NewUserRecord, PermissionImportRow, UserImportRow,
    validate_permission_rows, validate_user_rows,
};
pub use model::{AuditEvent, Module, Permission, Role, User};
pub use reconcile::{AssignmentDelta, reconcile};
pub use routes::{RouteEntry, RouteRegistry};
