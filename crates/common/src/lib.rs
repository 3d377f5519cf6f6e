// ================
// crates/common/src/lib.rs
// ================
//! Request and response bodies of the login service HTTP API.
//!
//! Field names are camelCase on the wire so existing browser clients of the
//! service keep working. Request fields are optional: a missing field is
//! reported by the server as a validation failure, not a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric user identifier assigned by the user store
pub type UserId = u64;

/// Body of `POST /api/register` and `POST /api/login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /api/logout` and `POST /api/verify`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Public view of a user account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
}

/// Identity carried by a live session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
}

/// Full session payload returned by `GET /api/user/{token}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: UserId,
    pub email: String,
    pub login_time: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// `201` reply to a registration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
}

/// `200` reply to a login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// `200` reply to logout; carries no payload besides the message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// `200` reply to a token verification
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

/// `200` reply to a session lookup
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserInfoResponse {
    pub success: bool,
    pub user: SessionInfo,
}

/// Body of every failed request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Stable machine-readable error code, e.g. `VAL_001`
    pub code: String,
}

/// Reply of `GET /health`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
