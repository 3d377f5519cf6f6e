//! In-memory user store.
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use super::{duplicate_email, User, UserStore};
use crate::error::AppError;
use crate::validation::normalize_email;

/// Accounts held in process memory, keyed by normalized email
#[derive(Debug)]
pub struct InMemoryStore {
    users: DashMap<String, User>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(normalized_email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        // the entry guard holds the shard lock across check and insert
        match self.users.entry(normalize_email(email)) {
            Entry::Occupied(_) => Err(duplicate_email()),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                };
                slot.insert(user.clone());
                Ok(user)
            },
        }
    }

    async fn user_count(&self) -> Result<usize, AppError> {
        Ok(self.users.len())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
