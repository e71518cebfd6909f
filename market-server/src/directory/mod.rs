//! User directory seam
//!
//! Identity and role lookup is owned by an external service; the order
//! core only consumes this read-only view of it.

use dashmap::DashMap;
use shared::error::AppResult;
use shared::models::{User, UserRole};

/// Read-only identity and role lookup
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up one user; absent users are `None`, not an error
    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>>;

    /// All verified users carrying the given role, id-ascending
    async fn find_verified_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;
}

/// In-process directory backed by a concurrent map
///
/// Stands in for the external user service in single-node deployments
/// and in tests.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: DashMap<i64, User>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn find_verified_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.role == role && u.is_verified)
            .map(|u| u.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}
