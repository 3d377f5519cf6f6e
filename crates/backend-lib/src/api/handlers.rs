//! Handler functions for the authentication endpoints.
//!
//! Each handler unpacks the request, calls into [`AuthService`] and shapes
//! the reply. Failures are returned as [`AppError`] and rendered by its
//! `IntoResponse` impl.
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use loginsvc_common::{
    CredentialsRequest, HealthResponse, LoginResponse, MessageResponse, RegisterResponse,
    TokenRequest, UserInfoResponse, VerifyResponse,
};

use crate::error::AppError;
use crate::AppState;

fn bad_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    AppError::Validation("Invalid request body".to_string())
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(body) = body.map_err(bad_body)?;
    let user = state
        .auth
        .register(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration successful".to_string(),
            user: user.summary(),
        }),
    ))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = body.map_err(bad_body)?;
    let outcome = state
        .auth
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token: outcome.token,
        user: outcome.user.summary(),
    }))
}

/// `POST /api/logout`
pub async fn logout(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = body.map_err(bad_body)?;
    state.auth.logout(body.token.as_deref().unwrap_or_default()).await?;
    Ok(Json(MessageResponse::ok("Logout successful")))
}

/// `POST /api/verify`
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let Json(body) = body.map_err(bad_body)?;
    let session = state.auth.user_info(body.token.as_deref().unwrap_or_default()).await?;

    Ok(Json(VerifyResponse {
        success: true,
        message: "Token is valid".to_string(),
        user: session.user(),
    }))
}

/// `GET /api/user/{token}`
pub async fn user_info(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<UserInfoResponse>, AppError> {
    let session = state.auth.user_info(&token).await?;
    Ok(Json(UserInfoResponse {
        success: true,
        user: session.info(),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions: state.sessions.active_sessions(),
    })
}
