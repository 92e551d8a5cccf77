//! Permission-key to route mapping.
//!
//! Screens are reachable by permission: each navigable permission key maps
//! to exactly one route and display name. The mapping is an explicit
//! enumeration validated at load time, never derived by splitting a
//! permission's display label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use warden_core::{DomainError, DomainResult};

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Permission key (e.g. "users.read").
    pub permission: String,
    /// Route path; must start with '/'.
    pub route: String,
    pub display_name: String,
}

/// Validated permission → route registry.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    by_permission: HashMap<String, RouteEntry>,
}

impl RouteRegistry {
    /// Build the registry, rejecting malformed or ambiguous entries.
    ///
    /// Validation failures:
    /// - empty permission key or display name
    /// - route not starting with '/'
    /// - duplicate permission key
    /// - duplicate route
    pub fn new(entries: Vec<RouteEntry>) -> DomainResult<Self> {
        let mut by_permission = HashMap::with_capacity(entries.len());
        let mut seen_routes = HashMap::with_capacity(entries.len());

        for entry in entries {
            if entry.permission.trim().is_empty() {
                return Err(DomainError::validation("route entry has empty permission key"));
            }
            if entry.display_name.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "route entry '{}' has empty display name",
                    entry.permission
                )));
            }
            if !entry.route.starts_with('/') {
                return Err(DomainError::validation(format!(
                    "route '{}' for '{}' must start with '/'",
                    entry.route, entry.permission
                )));
            }
            if let Some(prev) = seen_routes.insert(entry.route.clone(), entry.permission.clone()) {
                return Err(DomainError::validation(format!(
                    "route '{}' mapped by both '{}' and '{}'",
                    entry.route, prev, entry.permission
                )));
            }
            if by_permission
                .insert(entry.permission.clone(), entry)
                .is_some()
            {
                return Err(DomainError::validation("duplicate permission key in route registry"));
            }
        }

        Ok(Self { by_permission })
    }

    pub fn len(&self) -> usize {
        self.by_permission.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_permission.is_empty()
    }

    pub fn entry(&self, permission_key: &str) -> Option<&RouteEntry> {
        self.by_permission.get(permission_key)
    }

    /// The routes visible to a principal holding the given permission keys,
    /// ordered by display name.
    pub fn visible_for<'a, I>(&self, held: I) -> Vec<&RouteEntry>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<&RouteEntry> = held
            .into_iter()
            .filter_map(|key| self.by_permission.get(key))
            .collect();
        entries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        entries
    }
}
