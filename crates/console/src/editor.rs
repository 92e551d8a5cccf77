//! Permission assignment editing.
//!
//! An [`EditSession`] is the whole lifecycle of one editing dialog: load
//! the catalog and the owner's current grants, track toggles, preview the
//! delta for confirmation, commit, and end. The session is consumed by
//! commit or dropped on cancel; nothing about it is persisted.

use std::collections::HashSet;

use serde::Serialize;

use warden_client::{AdminApi, AssignmentOwner, ClientResult};
use warden_core::{DomainError, DomainResult, PermissionId};
use warden_rbac::{AssignmentDelta, PermissionCatalog, reconcile};

/// One permission-assignment editing session.
pub struct EditSession {
    owner: AssignmentOwner,
    catalog: PermissionCatalog,
    current: HashSet<PermissionId>,
    desired: HashSet<PermissionId>,
}

impl EditSession {
    /// Load the catalog and the owner's current grants; the desired
    /// selection starts equal to the current assignment.
    pub async fn begin<A: AdminApi>(api: &A, owner: AssignmentOwner) -> ClientResult<Self> {
        let catalog = PermissionCatalog::new(api.permission_catalog().await?);
        let current: HashSet<PermissionId> =
            api.owner_permissions(&owner).await?.into_iter().collect();
        let desired = current.clone();

        Ok(Self {
            owner,
            catalog,
            current,
            desired,
        })
    }

    pub fn owner(&self) -> &AssignmentOwner {
        &self.owner
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn current(&self) -> &HashSet<PermissionId> {
        &self.current
    }

    pub fn desired(&self) -> &HashSet<PermissionId> {
        &self.desired
    }

    /// Select a permission. Everything added to the desired set must come
    /// from the catalog.
    pub fn select(&mut self, id: PermissionId) -> DomainResult<()> {
        if !self.catalog.contains(&id) && !self.current.contains(&id) {
            return Err(DomainError::invalid_id(format!(
                "permission {id} is not in the catalog"
            )));
        }
        self.desired.insert(id);
        Ok(())
    }

    /// Deselect a permission; unknown IDs are a no-op.
    pub fn deselect(&mut self, id: PermissionId) {
        self.desired.remove(&id);
    }

    /// Replace the desired selection wholesale (the UI hands over the full
    /// checked set on save).
    pub fn set_desired(
        &mut self,
        ids: impl IntoIterator<Item = PermissionId>,
    ) -> DomainResult<()> {
        let mut desired = HashSet::new();
        for id in ids {
            if !self.catalog.contains(&id) && !self.current.contains(&id) {
                return Err(DomainError::invalid_id(format!(
                    "permission {id} is not in the catalog"
                )));
            }
            desired.insert(id);
        }
        self.desired = desired;
        Ok(())
    }

    /// The delta the confirmation gate shows. Computed fresh on every call.
    pub fn pending_delta(&self) -> AssignmentDelta {
        reconcile(&self.current, &self.desired)
    }

    /// Human-readable preview of the pending delta, permission names
    /// resolved through the catalog.
    pub fn describe_delta(&self) -> String {
        let delta = self.pending_delta();
        if delta.is_empty() {
            return "no changes".to_string();
        }

        let name = |id: &PermissionId| {
            self.catalog
                .get(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let mut parts = Vec::new();
        if !delta.to_add.is_empty() {
            let names: Vec<_> = delta.to_add.iter().map(name).collect();
            parts.push(format!("to add: {}", names.join(", ")));
        }
        if !delta.to_remove.is_empty() {
            let names: Vec<_> = delta.to_remove.iter().map(name).collect();
            parts.push(format!("to remove: {}", names.join(", ")));
        }
        parts.join("; ")
    }

    /// Apply the pending delta against the backend.
    ///
    /// Grant calls run first, then revoke calls, sequentially (one in
    /// flight at a time). An individual failure is recorded and the
    /// sequence continues; already-applied calls are not rolled back. The
    /// session is consumed either way, and the caller must re-fetch
    /// authoritative state instead of trusting the local selection.
    pub async fn commit<A: AdminApi>(self, api: &A) -> CommitOutcome {
        let delta = self.pending_delta();
        let mut outcome = CommitOutcome {
            granted: Vec::new(),
            revoked: Vec::new(),
            failures: Vec::new(),
        };

        if delta.is_empty() {
            return outcome;
        }

        for id in &delta.to_add {
            match api.grant_permission(&self.owner, *id).await {
                Ok(()) => outcome.granted.push(*id),
                Err(e) => {
                    tracing::warn!(owner = %self.owner, permission = %id, error = %e, "grant failed");
                    outcome.failures.push(CommitFailure {
                        permission: *id,
                        op: CommitOp::Grant,
                        error: e.to_string(),
                    });
                }
            }
        }

        for id in &delta.to_remove {
            match api.revoke_permission(&self.owner, *id).await {
                Ok(()) => outcome.revoked.push(*id),
                Err(e) => {
                    tracing::warn!(owner = %self.owner, permission = %id, error = %e, "revoke failed");
                    outcome.failures.push(CommitFailure {
                        permission: *id,
                        op: CommitOp::Revoke,
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOp {
    Grant,
    Revoke,
}

/// One failed grant/revoke call within a commit sequence.
#[derive(Debug, Clone, Serialize)]
pub struct CommitFailure {
    pub permission: PermissionId,
    pub op: CommitOp,
    pub error: String,
}

/// What actually happened during a commit. Partial application is possible
/// and is reported rather than rolled back.
#[derive(Debug, Clone, Serialize)]
pub struct CommitOutcome {
    pub granted: Vec<PermissionId>,
    pub revoked: Vec<PermissionId>,
    pub failures: Vec<CommitFailure>,
}

impl CommitOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::RoleId;
    use warden_rbac::Permission;

    fn perm(name: &str) -> Permission {
        Permission {
            id: PermissionId::new(),
            name: name.to_string(),
            description: String::new(),
            module_id: None,
            module_name: None,
            active: true,
        }
    }

    fn session(catalog: Vec<Permission>, current: &[PermissionId]) -> EditSession {
        let current: HashSet<PermissionId> = current.iter().copied().collect();
        EditSession {
            owner: AssignmentOwner::Role(RoleId::new()),
            catalog: PermissionCatalog::new(catalog),
            desired: current.clone(),
            current,
        }
    }

    #[test]
    fn select_requires_a_catalog_permission() {
        let a = perm("perm.a");
        let a_id = a.id;
        let mut s = session(vec![a], &[]);

        s.select(a_id).unwrap();
        assert_eq!(s.pending_delta().to_add, vec![a_id]);

        let err = s.select(PermissionId::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn selecting_an_already_current_permission_is_allowed() {
        // current grants can predate the catalog (e.g. a permission later
        // deactivated); keeping them selected must not error.
        let stale = PermissionId::new();
        let mut s = session(vec![], &[stale]);

        s.deselect(stale);
        s.select(stale).unwrap();
        assert!(s.pending_delta().is_empty());
    }

    #[test]
    fn deselect_of_unknown_id_is_a_noop() {
        let mut s = session(vec![perm("perm.a")], &[]);
        s.deselect(PermissionId::new());
        assert!(s.pending_delta().is_empty());
    }

    #[test]
    fn set_desired_rejects_ids_outside_catalog_and_current() {
        let a = perm("perm.a");
        let a_id = a.id;
        let mut s = session(vec![a], &[]);

        let err = s.set_desired([a_id, PermissionId::new()]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        // failed set_desired leaves the selection untouched
        assert!(s.pending_delta().is_empty());
    }

    #[test]
    fn describe_delta_names_both_directions() {
        let (a, c) = (perm("perm.a"), perm("perm.c"));
        let (a_id, c_id) = (a.id, c.id);
        let mut s = session(vec![a, c], &[a_id]);

        s.deselect(a_id);
        s.select(c_id).unwrap();

        let text = s.describe_delta();
        assert!(text.contains("to add: perm.c"), "got: {text}");
        assert!(text.contains("to remove: perm.a"), "got: {text}");
    }

    #[test]
    fn describe_delta_reports_no_changes() {
        let s = session(vec![perm("perm.a")], &[]);
        assert_eq!(s.describe_delta(), "no changes");
    }
}
