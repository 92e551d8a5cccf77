//! Fast-charge batch validation.
//!
//! Bulk creation of users/permissions from spreadsheet rows. Validation is
//! all-or-nothing: one invalid row blocks the entire batch with a single
//! aggregate error, and nothing is submitted.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{ModuleId, RoleId};

/// A user row as parsed from the uploaded spreadsheet.
#[derive(Debug, Clone, Deserialize)]
pub struct UserImportRow {
    pub name: String,
    pub email: String,
    pub role_id: String,
}

/// A permission row as parsed from the uploaded spreadsheet.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionImportRow {
    pub name: String,
    pub description: String,
    pub module_id: String,
}

/// Validated user record ready for the bulk endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub role_id: RoleId,
}

/// Validated permission record ready for the bulk endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermissionRecord {
    pub name: String,
    pub description: String,
    pub module_id: ModuleId,
}

/// Aggregate validation failure for a batch; lists every offending row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("batch rejected: {}", self.describe())]
pub struct BatchValidationError {
    /// (1-based row number, message) per invalid row.
    pub rows: Vec<(usize, String)>,
}

impl BatchValidationError {
    fn describe(&self) -> String {
        self.rows
            .iter()
            .map(|(row, msg)| format!("row {row}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate a user batch. Returns every record or none.
pub fn validate_user_rows(rows: &[UserImportRow]) -> Result<Vec<NewUserRecord>, BatchValidationError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        let name = row.name.trim();
        let email = row.email.trim();

        if name.is_empty() {
            errors.push((row_no, "name is required".to_string()));
            continue;
        }
        if email.is_empty() {
            errors.push((row_no, "email is required".to_string()));
            continue;
        }
        match RoleId::from_str(row.role_id.trim()) {
            Ok(role_id) => records.push(NewUserRecord {
                name: name.to_string(),
                email: email.to_lowercase(),
                role_id,
            }),
            Err(e) => errors.push((row_no, format!("invalid role id: {e}"))),
        }
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(BatchValidationError { rows: errors })
    }
}

/// Validate a permission batch. Returns every record or none.
pub fn validate_permission_rows(
    rows: &[PermissionImportRow],
) -> Result<Vec<NewPermissionRecord>, BatchValidationError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        let name = row.name.trim();

        if name.is_empty() {
            errors.push((row_no, "name is required".to_string()));
            continue;
        }
        match ModuleId::from_str(row.module_id.trim()) {
            Ok(module_id) => records.push(NewPermissionRecord {
                name: name.to_string(),
                description: row.description.trim().to_string(),
                module_id,
            }),
            Err(e) => errors.push((row_no, format!("invalid module id: {e}"))),
        }
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(BatchValidationError { rows: errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_row(name: &str, email: &str, role_id: &str) -> UserImportRow {
        UserImportRow {
            name: name.to_string(),
            email: email.to_string(),
            role_id: role_id.to_string(),
        }
    }

    #[test]
    fn valid_batch_passes_whole() {
        let role = RoleId::new();
        let rows = vec![
            user_row("Ana", "Ana@Example.com", &role.to_string()),
            user_row("Bo", "bo@example.com", &role.to_string()),
        ];

        let records = validate_user_rows(&rows).unwrap();
        assert_eq!(records.len(), 2);
        // email normalized to lowercase
        assert_eq!(records[0].email, "ana@example.com");
    }

    #[test]
    fn one_empty_name_rejects_entire_batch() {
        let role = RoleId::new();
        let rows = vec![
            user_row("Ana", "ana@example.com", &role.to_string()),
            user_row("   ", "bo@example.com", &role.to_string()),
        ];

        let err = validate_user_rows(&rows).unwrap_err();
        assert_eq!(err.rows.len(), 1);
        assert_eq!(err.rows[0].0, 2);
    }

    #[test]
    fn bad_foreign_key_rejects_entire_batch() {
        let rows = vec![user_row("Ana", "ana@example.com", "not-a-uuid")];
        let err = validate_user_rows(&rows).unwrap_err();
        assert!(err.rows[0].1.contains("invalid role id"));
    }

    #[test]
    fn aggregate_error_lists_every_bad_row() {
        let rows = vec![
            user_row("", "a@example.com", "x"),
            user_row("B", "", "y"),
            user_row("C", "c@example.com", "z"),
        ];
        let err = validate_user_rows(&rows).unwrap_err();
        assert_eq!(err.rows.len(), 3);
        let text = err.to_string();
        assert!(text.contains("row 1") && text.contains("row 2") && text.contains("row 3"));
    }

    #[test]
    fn permission_rows_require_name_and_module() {
        let module = ModuleId::new();
        let ok = PermissionImportRow {
            name: "users.read".to_string(),
            description: "list users".to_string(),
            module_id: module.to_string(),
        };
        let bad = PermissionImportRow {
            name: String::new(),
            description: String::new(),
            module_id: module.to_string(),
        };

        assert_eq!(validate_permission_rows(&[ok.clone()]).unwrap().len(), 1);
        let err = validate_permission_rows(&[ok, bad]).unwrap_err();
        assert_eq!(err.rows[0].0, 2);
    }
}
