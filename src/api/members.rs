//! Member API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::{created, require, success, ApiResult, JsonBody};
use crate::errors::AppError;
use crate::models::{CreateMemberRequest, Member, ReadScope, UpdateMemberRequest};
use crate::AppState;

/// Query string accepted by member reads.
#[derive(Debug, Default, Deserialize)]
pub struct MemberReadParams {
    #[serde(default)]
    pub include_deleted: bool,
}

/// GET /api/members - List members.
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<MemberReadParams>,
) -> ApiResult<Vec<Member>> {
    let members = state
        .members
        .find_all(ReadScope::from_flag(params.include_deleted))
        .await?;
    success(members)
}

/// GET /api/members/:id - Get a single member.
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MemberReadParams>,
) -> ApiResult<Member> {
    match state
        .members
        .find_by_id(&id, ReadScope::from_flag(params.include_deleted))
        .await?
    {
        Some(member) => success(member),
        None => Err(AppError::NotFound(format!("Member {} not found", id))),
    }
}

/// POST /api/members - Create a member, or revive a soft-deleted one.
pub async fn create_member(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateMemberRequest>,
) -> ApiResult<Member> {
    require(&request.id, "Member ID")?;
    require(&request.name, "Name")?;

    let member = state.members.create(&request).await?;
    created(member)
}

/// PUT /api/members/:id - Update a member.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateMemberRequest>,
) -> ApiResult<Member> {
    match state.members.update(&id, &request).await? {
        Some(member) => success(member),
        None => Err(AppError::NotFound(format!("Member {} not found", id))),
    }
}

/// DELETE /api/members/:id - Soft-delete a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.members.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
