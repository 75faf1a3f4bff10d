//! Project API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use super::{created, require, success, ApiResult, JsonBody};
use crate::errors::AppError;
use crate::models::{CreateProjectRequest, Project, UpdateProjectRequest};
use crate::AppState;

/// GET /api/projects - List all projects.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    success(state.repo.list_projects().await?)
}

/// GET /api/projects/:id - Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    match state.repo.get_project(&id).await? {
        Some(project) => success(project),
        None => Err(AppError::NotFound(format!("Project {} not found", id))),
    }
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateProjectRequest>,
) -> ApiResult<Project> {
    require(&request.name, "Project name")?;

    created(state.repo.create_project(&request).await?)
}

/// PUT /api/projects/:id - Update a project.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateProjectRequest>,
) -> ApiResult<Project> {
    match state.repo.update_project(&id, &request).await? {
        Some(project) => success(project),
        None => Err(AppError::NotFound(format!("Project {} not found", id))),
    }
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_project(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
