// ============================
// crates/backend-lib/src/auth/credentials.rs
// ============================
//! Account registration and credential checks on top of a [`UserStore`].
use std::sync::Arc;

use metrics::counter;

use super::password::{hash_password_secure, CredentialHasher};
use crate::error::AppError;
use crate::metrics::USER_REGISTERED;
use crate::storage::{duplicate_email, User, UserStore};
use crate::validation::{normalize_email, validate_email, validate_password};

/// Accounts created on a fresh store when demo seeding is enabled
pub const DEMO_USERS: [(&str, &str); 2] = [
    ("user@example.com", "password123"),
    ("admin@example.com", "admin123"),
];

/// User records plus the hasher that protects their passwords
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Look up an account, ignoring email case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(&normalize_email(email)).await
    }

    /// Validate and store a new account
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        validate_email(email)?;
        validate_password(password)?;

        // cheap early exit; the store re-checks atomically on insert
        if self.find_by_email(email).await?.is_some() {
            return Err(duplicate_email());
        }

        let hasher = Arc::clone(&self.hasher);
        let mut plain = password.to_string();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_secure(hasher.as_ref(), &mut plain))
                .await?
                .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let user = self.users.insert(email, &password_hash).await?;

        counter!(USER_REGISTERED).increment(1);
        tracing::info!(user_id = user.id, backend = self.users.backend_name(), "user registered");
        Ok(user)
    }

    /// Check a supplied password against the account's stored credential
    pub async fn verify_credential(&self, user: &User, supplied: &str) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let hash = user.password_hash.clone();
        let supplied = supplied.to_string();

        match tokio::task::spawn_blocking(move || hasher.verify(&hash, &supplied)).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, "credential verification task failed");
                false
            },
        }
    }

    /// Register each account that does not exist yet; returns how many were created
    pub async fn seed(&self, accounts: &[(&str, &str)]) -> Result<usize, AppError> {
        let mut created = 0;
        for (email, password) in accounts {
            match self.register(email, password).await {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => {},
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    /// Number of stored accounts
    pub async fn user_count(&self) -> Result<usize, AppError> {
        self.users.user_count().await
    }
}
