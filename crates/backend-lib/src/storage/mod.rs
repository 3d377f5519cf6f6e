// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! User record storage.
//!
//! The backend is picked once at startup from [`StorageSettings`]; nothing
//! downstream knows which one it is talking to.

mod memory;
mod persistent;

pub use memory::InMemoryStore;
pub use persistent::PersistentStore;

use std::sync::Arc;

use async_trait::async_trait;
use loginsvc_common::{UserId, UserSummary};
use serde::{Deserialize, Serialize};

use crate::config::{StorageBackend, StorageSettings};
use crate::error::AppError;

/// A registered account
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Email as it was registered
    pub email: String,
    /// PHC-format password hash
    pub password_hash: String,
}

impl User {
    /// Public view without the credential
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Trait for user storage backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by its normalized email
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<User>, AppError>;

    /// Insert a new account under the next free id.
    ///
    /// Fails with [`AppError::Conflict`] when the normalized email is taken.
    /// The check and the insert happen atomically.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    /// Number of stored accounts
    async fn user_count(&self) -> Result<usize, AppError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::Conflict("Email already registered".to_string())
}

/// Open the backend selected in the settings
pub async fn open_store(settings: &StorageSettings) -> Result<Arc<dyn UserStore>, AppError> {
    let store: Arc<dyn UserStore> = match settings.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory user store; accounts will not survive a restart");
            Arc::new(InMemoryStore::new())
        },
        StorageBackend::Persistent => Arc::new(PersistentStore::open(&settings.path).await?),
    };
    Ok(store)
}
