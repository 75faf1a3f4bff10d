//! Assignment API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use super::{created, require, success, ApiResult, JsonBody};
use crate::errors::AppError;
use crate::models::{Assignment, CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::AppState;

/// GET /api/assignments - List all assignments.
pub async fn list_assignments(State(state): State<AppState>) -> ApiResult<Vec<Assignment>> {
    success(state.repo.list_assignments().await?)
}

/// GET /api/assignments/:id - Get a single assignment.
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Assignment> {
    match state.repo.get_assignment(&id).await? {
        Some(assignment) => success(assignment),
        None => Err(AppError::NotFound(format!("Assignment {} not found", id))),
    }
}

/// POST /api/assignments - Create a new assignment.
pub async fn create_assignment(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAssignmentRequest>,
) -> ApiResult<Assignment> {
    require(&request.project_id, "Project ID")?;
    require(&request.member_id, "Member ID")?;

    created(state.repo.create_assignment(&request).await?)
}

/// PUT /api/assignments/:id - Update an assignment.
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateAssignmentRequest>,
) -> ApiResult<Assignment> {
    match state.repo.update_assignment(&id, &request).await? {
        Some(assignment) => success(assignment),
        None => Err(AppError::NotFound(format!("Assignment {} not found", id))),
    }
}

/// DELETE /api/assignments/:id - Delete an assignment.
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_assignment(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
