//! Authentication endpoints: register, login, token refresh.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::User;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email is already registered".into())
            }
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".into())
            }
            AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".into()),
            AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized("Invalid or expired refresh token".into())
            }
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::DatabaseError(e) => e.into(),
        }
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service
        .register(&req.email, &req.password, req.display_name.trim())
        .await?;

    tracing::info!(user_id = %result.user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: result.user,
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer",
            expires_in: result.expires_in,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service.login(&req.email, &req.password).await?;

    tracing::info!(user_id = %result.user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: result.user,
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let result = service.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer",
        expires_in: result.expires_in,
    }))
}
