//! Authentication service for user registration, login, and token refresh.

use std::sync::Arc;

use domain::models::User;
use persistence::repositories::{NewUser, UserRepository};
use shared::jwt::{JwtError, JwtKeys};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtKeys>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtKeys>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Register a new user with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthResult, AuthError> {
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let result = self
            .users
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                display_name: display_name.to_string(),
            })
            .await;

        // A concurrent registration can still hit the unique constraint.
        let user = match result {
            Err(sqlx::Error::Database(ref db_err))
                if db_err.code().as_deref() == Some("23505") =>
            {
                return Err(AuthError::EmailAlreadyExists);
            }
            other => other?,
        };

        self.issue_tokens(user)
    }

    /// Authenticate a user with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let valid = verify_password(password, &user.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The role claim is re-read from the database so a promotion (or a
    /// deactivation) takes effect on the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let role = user.role.as_str();
        let (access_token, _) = self.jwt.generate_access_token(user.id, role)?;
        let (refresh_token, _) = self.jwt.generate_refresh_token(user.id, role)?;

        Ok(RefreshResult {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }

    fn issue_tokens(&self, user: User) -> Result<AuthResult, AuthError> {
        let role = user.role.as_str();
        let (access_token, _) = self.jwt.generate_access_token(user.id, role)?;
        let (refresh_token, _) = self.jwt.generate_refresh_token(user.id, role)?;

        Ok(AuthResult {
            user,
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}

/// Password policy: at least 8 characters with an upper-case letter, a
/// lower-case letter, and a digit.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain an upper-case letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain a lower-case letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "Password must contain a digit".to_string(),
        ));
    }
    Ok(())
}
