//! Fast-charge spreadsheet import.
//!
//! CSV in, validated record arrays out, one bulk call to the backend.
//! Validation is all-or-nothing: if any row is invalid the batch is
//! rejected with an aggregate error and the upload endpoint is never
//! invoked.

use std::io::Read;

use thiserror::Error;

use warden_client::{AdminApi, ClientError};
use warden_rbac::{
    BatchValidationError, PermissionImportRow, UserImportRow, validate_permission_rows,
    validate_user_rows,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("spreadsheet parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] BatchValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Parse user rows from CSV with a `name,email,role_id` header.
pub fn read_user_rows<R: Read>(reader: R) -> Result<Vec<UserImportRow>, ImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Parse permission rows from CSV with a `name,description,module_id` header.
pub fn read_permission_rows<R: Read>(reader: R) -> Result<Vec<PermissionImportRow>, ImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Validate and bulk-create users. Returns how many records were submitted.
pub async fn fast_charge_users<A: AdminApi>(
    api: &A,
    rows: &[UserImportRow],
) -> Result<usize, ImportError> {
    let records = validate_user_rows(rows)?;
    api.fast_charge_users(&records).await?;
    tracing::info!(count = records.len(), "fast charge: users submitted");
    Ok(records.len())
}

/// Validate and bulk-create permissions. Returns how many records were
/// submitted.
pub async fn fast_charge_permissions<A: AdminApi>(
    api: &A,
    rows: &[PermissionImportRow],
) -> Result<usize, ImportError> {
    let records = validate_permission_rows(rows)?;
    api.fast_charge_permissions(&records).await?;
    tracing::info!(count = records.len(), "fast charge: permissions submitted");
    Ok(records.len())
}
