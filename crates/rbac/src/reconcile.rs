//! Assignment set reconciliation.
//!
//! When a role's (or user's) permission assignment is edited, the console
//! computes the minimal mutation needed to move the assignment from its
//! current state to the user-desired state. The same function serves the
//! role-permission editor, the user-profile editor, and the role-list
//! assignment dialog; only the owner of the resulting grant/revoke calls
//! differs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use warden_core::PermissionId;

/// The minimal add/remove delta between two assignment sets.
///
/// # Invariants
/// - `to_add ∩ to_remove = ∅`.
/// - `to_add = desired − current`, `to_remove = current − desired`.
/// - Both lists are sorted and duplicate-free.
///
/// A delta is computed fresh on every save, handed to the confirmation
/// gate, and discarded after commit or cancellation; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDelta {
    pub to_add: Vec<PermissionId>,
    pub to_remove: Vec<PermissionId>,
}

impl AssignmentDelta {
    /// True when committing this delta must be a no-op (zero network calls).
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// Compute the minimal mutation from `current` to `desired`.
///
/// - No IO
/// - No panics
/// - Deterministic: outputs are sorted, so equal inputs give equal outputs
pub fn reconcile(
    current: &HashSet<PermissionId>,
    desired: &HashSet<PermissionId>,
) -> AssignmentDelta {
    let mut to_add: Vec<PermissionId> = desired.difference(current).copied().collect();
    let mut to_remove: Vec<PermissionId> = current.difference(desired).copied().collect();

    to_add.sort();
    to_remove.sort();

    AssignmentDelta { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(n: usize) -> Vec<PermissionId> {
        (0..n).map(|_| PermissionId::new()).collect()
    }

    #[test]
    fn identical_sets_yield_empty_delta() {
        let set: HashSet<_> = ids(3).into_iter().collect();
        let delta = reconcile(&set, &set);
        assert!(delta.is_empty());
    }

    #[test]
    fn empty_current_adds_everything() {
        let desired: HashSet<_> = ids(3).into_iter().collect();
        let delta = reconcile(&HashSet::new(), &desired);
        assert_eq!(delta.to_add.len(), 3);
        assert!(delta.to_remove.is_empty());
    }

    #[test]
    fn empty_desired_removes_everything() {
        let current: HashSet<_> = ids(3).into_iter().collect();
        let delta = reconcile(&current, &HashSet::new());
        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove.len(), 3);
    }

    #[test]
    fn overlap_produces_minimal_delta() {
        // role starts with {a, b}; user selects {b, c}
        let [a, b, c] = [PermissionId::new(), PermissionId::new(), PermissionId::new()];
        let current: HashSet<_> = [a, b].into_iter().collect();
        let desired: HashSet<_> = [b, c].into_iter().collect();

        let delta = reconcile(&current, &desired);
        assert_eq!(delta.to_add, vec![c]);
        assert_eq!(delta.to_remove, vec![a]);
    }

    #[test]
    fn applying_a_delta_twice_is_idempotent() {
        // against a model where re-add/re-remove are no-ops (a set),
        // replaying the same delta leaves the assignment unchanged.
        let [a, b, c] = [PermissionId::new(), PermissionId::new(), PermissionId::new()];
        let current: HashSet<_> = [a, b].into_iter().collect();
        let desired: HashSet<_> = [b, c].into_iter().collect();
        let delta = reconcile(&current, &desired);

        let mut assignment = current.clone();
        for _ in 0..2 {
            for id in &delta.to_add {
                assignment.insert(*id);
            }
            for id in &delta.to_remove {
                assignment.remove(id);
            }
        }
        assert_eq!(assignment, desired);
    }

    fn arb_id_set() -> impl Strategy<Value = HashSet<PermissionId>> {
        // small universe so current/desired actually overlap
        prop::collection::hash_set(0u128..32, 0..16).prop_map(|raw| {
            raw.into_iter()
                .map(|n| PermissionId::from_uuid(uuid::Uuid::from_u128(n)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn delta_is_exact_set_difference(
            current in arb_id_set(),
            desired in arb_id_set(),
        ) {
            let delta = reconcile(&current, &desired);

            let added: HashSet<_> = delta.to_add.iter().copied().collect();
            let removed: HashSet<_> = delta.to_remove.iter().copied().collect();

            let expected_add: HashSet<_> = desired.difference(&current).copied().collect();
            let expected_remove: HashSet<_> = current.difference(&desired).copied().collect();

            prop_assert_eq!(&added, &expected_add);
            prop_assert_eq!(&removed, &expected_remove);
            prop_assert!(added.is_disjoint(&removed));

            // sorted + duplicate-free
            prop_assert_eq!(added.len(), delta.to_add.len());
            prop_assert_eq!(removed.len(), delta.to_remove.len());
            prop_assert!(delta.to_add.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(delta.to_remove.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn applying_delta_reaches_desired(
            current in arb_id_set(),
            desired in arb_id_set(),
        ) {
            let delta = reconcile(&current, &desired);

            let mut assignment = current.clone();
            for id in &delta.to_add {
                assignment.insert(*id);
            }
            for id in &delta.to_remove {
                assignment.remove(id);
            }
            prop_assert_eq!(assignment, desired);
        }
    }
}
