//! In-memory privilege store with route based resolution.
use std::collections::{HashMap, HashSet};

use admin_gate_common::Uid;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use super::{PrivilegeSet, PrivilegeStore, PrivilegeToken};
use crate::error::AppError;

/// Privileges grantable to non-administrators
pub const ADMIN_PRIVILEGES: [&str; 7] = [
    "admin:dashboard",
    "admin:categories",
    "admin:privileges",
    "admin:admins-mods",
    "admin:users",
    "admin:groups",
    "admin:tags",
];

const ADMIN_SETTINGS: &str = "admin:settings";

const ROUTE_MAP: [(&str, &str); 12] = [
    ("dashboard", "admin:dashboard"),
    ("manage/categories", "admin:categories"),
    ("manage/privileges", "admin:privileges"),
    ("manage/admins-mods", "admin:admins-mods"),
    ("manage/users", "admin:users"),
    ("manage/groups", "admin:groups"),
    ("manage/tags", "admin:tags"),
    ("settings/tags", "admin:tags"),
    ("extend/plugins", ADMIN_SETTINGS),
    ("extend/widgets", ADMIN_SETTINGS),
    ("extend/rewards", ADMIN_SETTINGS),
    ("category/uploadpicture", "admin:categories"),
];

const ROUTE_PREFIX_MAP: [(&str, &str); 8] = [
    ("dashboard/", "admin:dashboard"),
    ("manage/categories/", "admin:categories"),
    ("manage/privileges/", "admin:privileges"),
    ("manage/groups/", "admin:groups"),
    ("manage/users/", "admin:users"),
    ("settings/", ADMIN_SETTINGS),
    ("appearance/", ADMIN_SETTINGS),
    ("plugins/", ADMIN_SETTINGS),
];

/// Privilege store kept in memory
pub struct InMemoryPrivileges {
    routes: HashMap<String, PrivilegeToken>,
    prefixes: Vec<(String, PrivilegeToken)>,
    known: Vec<PrivilegeToken>,
    administrators: DashSet<Uid>,
    grants: DashMap<Uid, HashSet<PrivilegeToken>>,
}

impl Default for InMemoryPrivileges {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPrivileges {
    /// Store preloaded with the default admin route map
    pub fn new() -> Self {
        let routes = ROUTE_MAP
            .iter()
            .map(|(path, token)| (path.to_string(), PrivilegeToken::from(*token)))
            .collect();
        let mut prefixes: Vec<(String, PrivilegeToken)> = ROUTE_PREFIX_MAP
            .iter()
            .map(|(prefix, token)| (prefix.to_string(), PrivilegeToken::from(*token)))
            .collect();
        // longest prefix wins
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let known = ADMIN_PRIVILEGES
            .iter()
            .chain(std::iter::once(&ADMIN_SETTINGS))
            .map(|token| PrivilegeToken::from(*token))
            .collect();

        Self {
            routes,
            prefixes,
            known,
            administrators: DashSet::new(),
            grants: DashMap::new(),
        }
    }

    pub fn add_administrator(&self, uid: Uid) {
        self.administrators.insert(uid);
    }

    pub fn is_administrator(&self, uid: Uid) -> bool {
        self.administrators.contains(&uid)
    }

    pub fn grant(&self, uid: Uid, privilege: impl Into<PrivilegeToken>) {
        self.grants.entry(uid).or_default().insert(privilege.into());
    }

    pub fn revoke(&self, uid: Uid, privilege: &PrivilegeToken) {
        if let Some(mut set) = self.grants.get_mut(&uid) {
            set.remove(privilege);
        }
    }

    fn holds(&self, privilege: &PrivilegeToken, uid: Uid) -> bool {
        if uid <= 0 {
            return false;
        }
        self.is_administrator(uid)
            || self
                .grants
                .get(&uid)
                .is_some_and(|set| set.contains(privilege))
    }
}

#[async_trait]
impl PrivilegeStore for InMemoryPrivileges {
    fn resolve(&self, path: &str) -> PrivilegeToken {
        if let Some(token) = self.routes.get(path) {
            return token.clone();
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, token)| token.clone())
            .unwrap_or_else(PrivilegeToken::superadmin)
    }

    async fn can(&self, privilege: &PrivilegeToken, uid: Uid) -> Result<bool, AppError> {
        Ok(self.holds(privilege, uid))
    }

    async fn get_all(&self, uid: Uid) -> Result<PrivilegeSet, AppError> {
        Ok(self
            .known
            .iter()
            .map(|token| (token.clone(), self.holds(token, uid)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_route() {
        let store = InMemoryPrivileges::new();
        assert_eq!(store.resolve("manage/users").as_str(), "admin:users");
        assert_eq!(store.resolve("settings/tags").as_str(), "admin:tags");
    }

    #[test]
    fn test_resolve_prefix_route() {
        let store = InMemoryPrivileges::new();
        assert_eq!(store.resolve("manage/users/42").as_str(), "admin:users");
        assert_eq!(store.resolve("settings/general").as_str(), "admin:settings");
        assert_eq!(store.resolve("dashboard/logins").as_str(), "admin:dashboard");
    }

    #[test]
    fn test_resolve_unmapped_route_needs_administrator() {
        let store = InMemoryPrivileges::new();
        assert_eq!(store.resolve("advanced/database"), PrivilegeToken::superadmin());
    }

    #[tokio::test]
    async fn test_can() {
        let store = InMemoryPrivileges::new();
        store.grant(2, "admin:users");
        store.add_administrator(1);

        let users = PrivilegeToken::from("admin:users");
        assert!(store.can(&users, 2).await.unwrap());
        assert!(!store.can(&PrivilegeToken::from("admin:tags"), 2).await.unwrap());
        assert!(store.can(&PrivilegeToken::superadmin(), 1).await.unwrap());
        assert!(!store.can(&PrivilegeToken::superadmin(), 2).await.unwrap());

        store.revoke(2, &users);
        assert!(!store.can(&users, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_guest_holds_nothing() {
        let store = InMemoryPrivileges::new();
        store.grant(0, "admin:users");
        assert!(!store.can(&PrivilegeToken::from("admin:users"), 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_all() {
        let store = InMemoryPrivileges::new();
        store.grant(2, "admin:tags");

        let set = store.get_all(2).await.unwrap();
        assert_eq!(set.len(), ADMIN_PRIVILEGES.len() + 1);
        assert_eq!(set.get(&PrivilegeToken::from("admin:tags")), Some(&true));
        assert_eq!(set.values().filter(|granted| **granted).count(), 1);

        let nobody = store.get_all(3).await.unwrap();
        assert!(!nobody.values().any(|granted| *granted));

        store.add_administrator(1);
        assert!(store.get_all(1).await.unwrap().values().all(|granted| *granted));
    }
}
