//! Position level API endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::AppState;

/// GET /api/position-levels - List position level names in catalog order.
pub async fn list_position_levels(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    success(state.repo.list_position_levels().await?)
}
