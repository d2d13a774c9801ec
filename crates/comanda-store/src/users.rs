//! # User Repository
//!
//! Profile reads for the shell router. The identity provider owns
//! authentication; this repository only maps the `users` collection to
//! the profile the routing function consumes.

use std::sync::Arc;

use crate::document::{collections, encode, DocumentStore};
use crate::error::StoreResult;
use comanda_core::UserProfile;

/// Repository for user profile documents.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        UserRepository { store }
    }

    /// Fetches one profile by uid.
    pub async fn profile(&self, uid: &str) -> StoreResult<Option<UserProfile>> {
        match self.store.get(collections::USERS, uid).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Writes a profile (first sign-in, role selection).
    pub async fn upsert(&self, profile: &UserProfile) -> StoreResult<()> {
        self.store
            .put(collections::USERS, &profile.uid, encode(profile)?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use comanda_core::Role;

    #[tokio::test]
    async fn test_profile_round_trip() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        let profile = UserProfile {
            uid: "u-1".to_string(),
            email: "ana@example.com".to_string(),
            email_verified: true,
            role: Some(Role::Client),
        };

        repo.upsert(&profile).await.unwrap();
        let loaded = repo.profile("u-1").await.unwrap().unwrap();
        assert_eq!(loaded.email, "ana@example.com");
        assert_eq!(loaded.role, Some(Role::Client));

        assert!(repo.profile("ghost").await.unwrap().is_none());
    }
}
