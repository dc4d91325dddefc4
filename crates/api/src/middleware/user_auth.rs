//! User JWT authentication middleware.
//!
//! Validates Bearer tokens and stores the authenticated user's identity
//! and role in request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use domain::models::UserRole;
use shared::jwt::JwtKeys;

use crate::app::AppState;

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Role claim captured at token issuance.
    pub role: UserRole,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt: &JwtKeys, token: &str) -> Result<Self, String> {
        let claims = jwt
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| "Invalid role in token".to_string())?;

        Ok(UserAuth {
            user_id,
            role,
            jti: claims.jti,
        })
    }
}

/// Middleware that requires JWT user authentication.
///
/// Rejects requests without a valid access token; on success the
/// authenticated user info is stored in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Middleware that requires an authenticated admin user.
///
/// Authentication failures return 401; a valid token without the admin
/// role returns 403.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) if auth.role.can_moderate() => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Ok(_) => forbidden_response("Admin access required"),
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Missing or invalid Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Admin access required");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_user_auth_clone() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            role: UserRole::Creator,
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.user_id, cloned.user_id);
        assert_eq!(auth.role, cloned.role);
        assert_eq!(auth.jti, cloned.jti);
    }

    #[test]
    fn test_validate_with_test_keys() {
        let keys = JwtKeys::new_for_testing("middleware_test_secret");
        let user_id = Uuid::new_v4();
        let (token, _) = keys.generate_access_token(user_id, "admin").unwrap();

        let auth = UserAuth::validate(&keys, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.role, UserRole::Admin);
        assert!(auth.role.can_moderate());
    }

    #[test]
    fn test_validate_rejects_unknown_role_claim() {
        let keys = JwtKeys::new_for_testing("middleware_test_secret");
        let (token, _) = keys
            .generate_access_token(Uuid::new_v4(), "superuser")
            .unwrap();

        assert!(UserAuth::validate(&keys, &token).is_err());
    }

    #[test]
    fn test_validate_rejects_garbage_token() {
        let keys = JwtKeys::new_for_testing("middleware_test_secret");
        assert!(UserAuth::validate(&keys, "not.a.token").is_err());
    }
}
