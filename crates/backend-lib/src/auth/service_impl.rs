use async_trait::async_trait;
use metrics::counter;

use crate::auth::{AuthService, CredentialStore, LoginOutcome, Session, SessionManager};
use crate::error::AppError;
use crate::metrics::LOGIN_FAILED;
use crate::storage::User;
use crate::validation::validate_email;

pub struct DefaultAuth {
    credentials: CredentialStore,
    sm: SessionManager,
}

impl DefaultAuth {
    pub fn new(credentials: CredentialStore, sm: SessionManager) -> Self {
        Self { credentials, sm }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

fn login_failed(reason: &'static str, message: &str) -> AppError {
    counter!(LOGIN_FAILED, "reason" => reason).increment(1);
    tracing::warn!(reason, "login failed");
    AppError::Authentication(message.to_string())
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.credentials.register(email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        validate_email(email)?;

        let Some(user) = self.credentials.find_by_email(email).await? else {
            return Err(login_failed("unknown_user", "User not found"));
        };
        if !self.credentials.verify_credential(&user, password).await {
            return Err(login_failed("bad_password", "Invalid password"));
        }

        let token = self.sm.issue(user.id, &user.email);
        Ok(LoginOutcome { token, user })
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        if self.sm.revoke(token) {
            Ok(())
        } else {
            Err(AppError::Session("Invalid session".to_string()))
        }
    }

    async fn verify_token(&self, token: &str) -> bool {
        self.sm.is_valid(token)
    }

    async fn user_info(&self, token: &str) -> Result<Session, AppError> {
        self.sm
            .get_session(token)
            .ok_or_else(|| AppError::Session("Invalid token".to_string()))
    }
}
