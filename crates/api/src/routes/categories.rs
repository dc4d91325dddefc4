//! Category listing endpoint.

use axum::{extract::State, response::IntoResponse, Json};

use persistence::repositories::CategoryRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = CategoryRepository::new(state.pool.clone());
    let rows = categories.list_all().await?;

    Ok(Json(rows))
}
