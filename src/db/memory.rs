//! In-process user store with the same uniqueness rules as the `users` table.
//! Backs the router in tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::store::{NewUser, StoreError, UserRow, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserRow>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, in insertion order.
    pub fn users(&self) -> Vec<UserRow> {
        self.lock().map(|users| users.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<UserRow>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Other(anyhow::anyhow!("user store lock poisoned")))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, user: &NewUser) -> Result<UserRow, StoreError> {
        let mut users = self.lock()?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation {
                constraint: Some("users_username_key".to_string()),
            });
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: Some("users_email_key".to_string()),
            });
        }
        let row = UserRow {
            id: users.len() as i64 + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.lock()?.iter().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryUserStore::new();
        let a = store.insert_user(&new_user("ana", "ana@example.com")).await.unwrap();
        let b = store.insert_user(&new_user("ben", "ben@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn rejects_duplicate_username_or_email() {
        let store = MemoryUserStore::new();
        store.insert_user(&new_user("ana", "ana@example.com")).await.unwrap();

        let dup_email = store.insert_user(&new_user("other", "ana@example.com")).await;
        assert!(matches!(dup_email, Err(StoreError::UniqueViolation { .. })));
        let dup_name = store.insert_user(&new_user("ana", "new@example.com")).await;
        assert!(matches!(dup_name, Err(StoreError::UniqueViolation { .. })));
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn finds_by_email() {
        let store = MemoryUserStore::new();
        store.insert_user(&new_user("ana", "ana@example.com")).await.unwrap();
        let found = store.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.username), Some("ana".to_string()));
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
