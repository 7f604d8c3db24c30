//! Account records and the in-memory account store
//!
//! The store is the single source of truth for account state. Keys are
//! [`UserId`]s, which can only be built through normalization, so a raw
//! caller-supplied string never reaches the map.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::SeedAccount;

/// Normalized user identifier: surrounding whitespace removed, lowercased.
///
/// ```rust
/// use sentinel_service::account::UserId;
///
/// assert_eq!(UserId::new("  USER_404 ").as_str(), "user_404");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

/// Account status as seen on the wire
///
/// `Unknown` is never stored; it is the view returned for identifiers
/// without a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Locked,
    Unknown,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Locked => "LOCKED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

/// A stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Display name
    pub name: String,
    /// Current status, ACTIVE or LOCKED
    pub status: AccountStatus,
    /// Role
    pub role: Role,
}

/// Result of a status read
///
/// Serializes to the account record when present and to
/// `{"status": "UNKNOWN"}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AccountView {
    Known(Account),
    Unknown { status: AccountStatus },
}

impl AccountView {
    pub fn unknown() -> Self {
        Self::Unknown {
            status: AccountStatus::Unknown,
        }
    }

    pub fn status(&self) -> AccountStatus {
        match self {
            Self::Known(account) => account.status,
            Self::Unknown { status } => *status,
        }
    }
}

/// Result of a lock attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// ACTIVE → LOCKED
    Locked,
    /// The account was already LOCKED; nothing changed
    AlreadyLocked,
    /// No account exists for the identifier
    NotFound,
}

/// Concurrent in-memory account store
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Arc<DashMap<UserId, Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed definitions
    ///
    /// A seed with status UNKNOWN is stored as ACTIVE. Later duplicates
    /// (after normalization) replace earlier ones.
    pub fn seeded(seeds: &[SeedAccount]) -> Self {
        let store = Self::new();
        for seed in seeds {
            let status = match seed.status {
                AccountStatus::Unknown => AccountStatus::Active,
                status => status,
            };
            store.insert(
                UserId::new(&seed.user_id),
                Account {
                    name: seed.name.clone(),
                    status,
                    role: seed.role,
                },
            );
        }
        store
    }

    pub fn insert(&self, id: UserId, account: Account) {
        self.accounts.insert(id, account);
    }

    pub fn get(&self, id: &UserId) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    /// Status view for an identifier, UNKNOWN when absent
    pub fn view(&self, id: &UserId) -> AccountView {
        self.get(id)
            .map(AccountView::Known)
            .unwrap_or_else(AccountView::unknown)
    }

    /// Move an account to LOCKED
    pub fn lock(&self, id: &UserId) -> LockTransition {
        match self.accounts.get_mut(id) {
            Some(mut entry) => {
                if entry.status == AccountStatus::Locked {
                    LockTransition::AlreadyLocked
                } else {
                    entry.status = AccountStatus::Locked;
                    LockTransition::Locked
                }
            }
            None => LockTransition::NotFound,
        }
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Known identifiers, sorted
    pub fn ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.accounts.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn seeded() -> AccountStore {
        AccountStore::seeded(&Config::default().seed)
    }

    #[test]
    fn test_user_id_normalization() {
        for raw in [" User_404 ", "user_404", "USER_404", "\tuser_404\n"] {
            assert_eq!(UserId::new(raw).as_str(), "user_404");
        }
    }

    #[test]
    fn test_user_id_deserialize_normalizes() {
        let id: UserId = serde_json::from_str("\"  Ghost_1 \"").unwrap();
        assert_eq!(id.as_str(), "ghost_1");
    }

    #[test]
    fn test_seeded_accounts() {
        let store = seeded();
        assert_eq!(store.len(), 2);

        let alice = store.get(&UserId::new("user_101")).unwrap();
        assert_eq!(alice.name, "Alice Admin");
        assert_eq!(alice.role, Role::Admin);
        assert_eq!(alice.status, AccountStatus::Active);

        let john = store.get(&UserId::new("USER_404")).unwrap();
        assert_eq!(john.name, "John Doe");
        assert_eq!(john.role, Role::Viewer);
    }

    #[test]
    fn test_seed_normalizes_ids() {
        let store = AccountStore::seeded(&[SeedAccount::new(" Ops_1 ", "Ops", Role::Admin)]);
        assert_eq!(store.ids(), vec![UserId::new("ops_1")]);
    }

    #[test]
    fn test_lock_transitions() {
        let store = seeded();
        let id = UserId::new("user_404");

        assert_eq!(store.lock(&id), LockTransition::Locked);
        assert_eq!(store.get(&id).unwrap().status, AccountStatus::Locked);
        assert_eq!(store.lock(&id), LockTransition::AlreadyLocked);
        assert_eq!(store.get(&id).unwrap().status, AccountStatus::Locked);

        // the other account is untouched
        let other = store.get(&UserId::new("user_101")).unwrap();
        assert_eq!(other.status, AccountStatus::Active);
    }

    #[test]
    fn test_lock_missing_does_not_insert() {
        let store = seeded();
        let ghost = UserId::new("ghost_1");
        assert_eq!(store.lock(&ghost), LockTransition::NotFound);
        assert!(!store.contains(&ghost));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_view_serialization() {
        let store = seeded();

        let known = serde_json::to_value(store.view(&UserId::new("user_101"))).unwrap();
        assert_eq!(
            known,
            serde_json::json!({"name": "Alice Admin", "status": "ACTIVE", "role": "admin"})
        );

        let unknown = serde_json::to_value(store.view(&UserId::new("nobody"))).unwrap();
        assert_eq!(unknown, serde_json::json!({"status": "UNKNOWN"}));
    }

    #[test]
    fn test_clones_share_state() {
        let store = seeded();
        let clone = store.clone();
        clone.lock(&UserId::new("user_101"));
        assert_eq!(
            store.view(&UserId::new("user_101")).status(),
            AccountStatus::Locked
        );
    }
}
