// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the in-process entry point
//! shared by the HTTP handlers and embedding programs.
use async_trait::async_trait;

use super::Session;
use crate::error::AppError;
use crate::storage::User;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account. Empty values fail validation like malformed ones.
    async fn register(&self, email: &str, password: &str) -> Result<User, AppError>;

    /// Check credentials and open a session
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError>;

    /// Close the session named by `token`
    async fn logout(&self, token: &str) -> Result<(), AppError>;

    /// Whether `token` names a live session
    async fn verify_token(&self, token: &str) -> bool;

    /// The live session named by `token`
    async fn user_info(&self, token: &str) -> Result<Session, AppError>;
}
