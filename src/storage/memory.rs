//! In-process storage backend
//!
//! Holds users and apps behind one lock so that email uniqueness is checked
//! and enforced atomically. Used as the test fixture and by embedders that do
//! not need durability.

use super::{AppProvider, StorageError, UserProvider, UserSaver};
use crate::models::{App, User};

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    users: HashMap<i64, StoredUser>,
    ids_by_email: HashMap<String, i64>,
    apps: HashMap<i64, App>,
    last_user_id: i64,
}

struct StoredUser {
    user: User,
    is_admin: bool,
}

#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an app, replacing any app with the same id
    pub async fn add_app(&self, app: App) {
        self.inner.write().await.apps.insert(app.id, app);
    }

    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .users
            .get_mut(&user_id)
            .ok_or(StorageError::UserNotFound)?;
        stored.is_admin = is_admin;
        Ok(())
    }
}

#[async_trait]
impl UserSaver for MemoryStorage {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError> {
        let mut inner = self.inner.write().await;

        if inner.ids_by_email.contains_key(email) {
            return Err(StorageError::UserExists);
        }

        inner.last_user_id += 1;
        let id = inner.last_user_id;

        inner.ids_by_email.insert(email.to_string(), id);
        inner.users.insert(
            id,
            StoredUser {
                user: User {
                    id,
                    email: email.to_string(),
                    pass_hash: pass_hash.to_string(),
                },
                is_admin: false,
            },
        );

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for MemoryStorage {
    async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
        let inner = self.inner.read().await;
        inner
            .ids_by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .map(|stored| stored.user.clone())
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        self.inner
            .read()
            .await
            .users
            .get(&user_id)
            .map(|stored| stored.is_admin)
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for MemoryStorage {
    async fn app(&self, app_id: i64) -> Result<App, StorageError> {
        self.inner
            .read()
            .await
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ids_assigned_from_one() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.save_user("a@x.com", "h1").await.unwrap(), 1);
        assert_eq!(storage.save_user("b@x.com", "h2").await.unwrap(), 2);

        let user = storage.user_by_email("b@x.com").await.unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.pass_hash, "h2");
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let storage = MemoryStorage::new();
        storage.save_user("a@x.com", "h").await.unwrap();

        assert!(matches!(
            storage.user_by_email("A@x.com").await,
            Err(StorageError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        let storage = Arc::new(MemoryStorage::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move { storage.save_user("dup@x.com", "h").await })
            })
            .collect();

        let mut saved = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => saved += 1,
                Err(StorageError::UserExists) => conflicts += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(saved, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_admin_flag() {
        let storage = MemoryStorage::new();
        let id = storage.save_user("a@x.com", "h").await.unwrap();

        assert!(!storage.is_admin(id).await.unwrap());
        storage.set_admin(id, true).await.unwrap();
        assert!(storage.is_admin(id).await.unwrap());

        assert!(matches!(
            storage.is_admin(99).await,
            Err(StorageError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_app_lookup() {
        let storage = MemoryStorage::new();
        storage
            .add_app(App {
                id: 7,
                name: "web".into(),
                secret: "s3cret".into(),
            })
            .await;

        assert_eq!(storage.app(7).await.unwrap().secret, "s3cret");
        assert!(matches!(
            storage.app(8).await,
            Err(StorageError::AppNotFound)
        ));
    }
}
