use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::JwtKeys;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin, auth, campaigns, categories, comments, contact, donations, favorites, health, updates,
    users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    // Keys are parsed once at startup; a bad key pair fails fast here.
    let jwt = Arc::new(JwtKeys::with_leeway(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?);

    // Rate limiting is disabled when the per-minute limit is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/campaigns", get(campaigns::list_campaigns))
        .route("/api/v1/campaigns/:id", get(campaigns::get_campaign))
        .route(
            "/api/v1/campaigns/:id/donations",
            get(donations::list_campaign_donations),
        )
        .route(
            "/api/v1/campaigns/:id/comments",
            get(comments::list_campaign_comments),
        )
        .route(
            "/api/v1/campaigns/:id/updates",
            get(updates::list_campaign_updates),
        )
        .route("/api/v1/categories", get(categories::list_categories))
        .route("/api/v1/contact", post(contact::submit_contact_message));

    // Protected routes (require a valid user access token).
    // Rate limiting runs after auth so it can key on the user id.
    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(users::get_me))
        .route("/api/v1/users/me", put(users::update_me))
        .route(
            "/api/v1/users/me/become-creator",
            post(users::become_creator),
        )
        .route("/api/v1/users/me/donations", get(users::list_my_donations))
        .route("/api/v1/users/me/campaigns", get(campaigns::list_my_campaigns))
        .route("/api/v1/users/me/favorites", get(favorites::list_my_favorites))
        .route("/api/v1/campaigns", post(campaigns::create_campaign))
        .route("/api/v1/campaigns/:id", put(campaigns::update_campaign))
        .route("/api/v1/campaigns/:id/submit", post(campaigns::submit_campaign))
        .route("/api/v1/campaigns/:id/cancel", post(campaigns::cancel_campaign))
        .route("/api/v1/campaigns/:id/donations", post(donations::create_donation))
        .route("/api/v1/campaigns/:id/comments", post(comments::create_comment))
        .route("/api/v1/campaigns/:id/updates", post(updates::create_update))
        .route("/api/v1/campaigns/:id/favorite", put(favorites::add_favorite))
        .route(
            "/api/v1/campaigns/:id/favorite",
            delete(favorites::remove_favorite),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin routes (require the admin role)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/campaigns/pending",
            get(admin::list_pending_campaigns),
        )
        .route(
            "/api/v1/admin/campaigns/:id/approve",
            post(admin::approve_campaign),
        )
        .route(
            "/api/v1/admin/campaigns/:id/reject",
            post(admin::reject_campaign),
        )
        .route(
            "/api/v1/admin/campaigns/:id/featured",
            put(admin::set_campaign_featured),
        )
        .route(
            "/api/v1/admin/users/:id/active",
            put(admin::set_user_active),
        )
        .route("/api/v1/admin/comments/:id", delete(admin::delete_comment))
        .route(
            "/api/v1/admin/contact-messages",
            get(admin::list_contact_messages),
        )
        .route("/api/v1/admin/stats", get(admin::get_admin_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
