//! `warden-client` — typed async client for the Warden backend REST API.
//!
//! All data operations of the console go through this crate: the RBAC
//! endpoints (catalog, grants), entity CRUD with pagination, audit logs,
//! fast-charge bulk uploads, and report generation. The credential lives in
//! one place ([`auth::AuthSession`]) and a 401 from any endpoint clears it.

pub mod api;
pub mod auth;
pub mod error;
pub mod http;

pub use api::{
    AdminApi, AssignmentOwner, NewModule, NewRole, NewUser, ReportFormat, ReportRequest,
    UpdateModule, UpdateRole, UpdateUser,
};
pub use auth::{AuthSession, CredentialStore, InMemoryCredentialStore};
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
