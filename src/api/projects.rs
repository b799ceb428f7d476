//! Project and team endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::project::{CreateProject, Project, ProjectDetails, ProjectQuery, UpdateProject},
};

use super::{parse_id, AuthenticatedUser, PaginatedResponse};

/// Add team member request
#[derive(Deserialize, Validate, ToSchema)]
pub struct AddTeamMemberRequest {
    /// User to add
    pub user_id: uuid::Uuid,
    /// Role inside the team
    #[validate(length(min = 1, max = 50, message = "Role must be 1-50 characters"))]
    pub role: String,
}

/// List projects with filters and pagination
#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    params(ProjectQuery),
    responses(
        (status = 200, description = "List of projects", body = PaginatedResponse<Project>)
    )
)]
pub async fn list_projects(
    State(state): State<crate::AppState>,
    Query(query): Query<ProjectQuery>,
) -> AppResult<Json<PaginatedResponse<Project>>> {
    query.validate()?;

    let (items, total) = state.services.projects.list_projects(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(10),
    }))
}

/// Get project with its team ledger and derived sizes
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectDetails),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectDetails>> {
    let id = parse_id(&id, "project")?;
    let details = state.services.projects.get_project(id).await?;
    Ok(Json(details))
}

/// Create a project owned by the authenticated user
#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    security(("bearer_auth" = [])),
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_project(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    request.validate()?;

    let created = state
        .services
        .projects
        .create_project(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a project (owner only)
#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Not the project owner"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    request.validate()?;

    let id = parse_id(&id, "project")?;
    let updated = state
        .services
        .projects
        .update_project(id, claims.user_id, request)
        .await?;
    Ok(Json(updated))
}

/// Delete a project (owner only)
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Not the project owner"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "project")?;
    state
        .services
        .projects
        .delete_project(id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a team member (owner only)
#[utoipa::path(
    post,
    path = "/projects/{id}/team",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = AddTeamMemberRequest,
    responses(
        (status = 200, description = "Team member added", body = ProjectDetails),
        (status = 403, description = "Not the project owner"),
        (status = 404, description = "Project or user not found"),
        (status = 409, description = "Already a member or team is full")
    )
)]
pub async fn add_team_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<AddTeamMemberRequest>,
) -> AppResult<Json<ProjectDetails>> {
    request.validate()?;

    let id = parse_id(&id, "project")?;
    let details = state
        .services
        .projects
        .add_team_member(id, claims.user_id, request.user_id, request.role)
        .await?;
    Ok(Json(details))
}

/// Remove a team member (owner only). The ledger entry is kept with
/// status `removed`.
#[utoipa::path(
    delete,
    path = "/projects/{id}/team/{user_id}",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Project ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Team member removed", body = ProjectDetails),
        (status = 403, description = "Not the project owner"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "User is not an active team member")
    )
)]
pub async fn remove_team_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, user_id)): Path<(String, String)>,
) -> AppResult<Json<ProjectDetails>> {
    let id = parse_id(&id, "project")?;
    let user_id = parse_id(&user_id, "user")?;
    let details = state
        .services
        .projects
        .remove_team_member(id, claims.user_id, user_id)
        .await?;
    Ok(Json(details))
}
