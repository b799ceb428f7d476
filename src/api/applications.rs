//! Application endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::application::{
        Application, ApplicationQuery, CreateApplication, UpdateApplicationStatus,
    },
};

use super::{parse_id, AuthenticatedUser, PaginatedResponse};

/// List applications with filters and pagination
#[utoipa::path(
    get,
    path = "/applications",
    tag = "applications",
    security(("bearer_auth" = [])),
    params(ApplicationQuery),
    responses(
        (status = 200, description = "List of applications", body = PaginatedResponse<Application>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_applications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ApplicationQuery>,
) -> AppResult<Json<PaginatedResponse<Application>>> {
    query.validate()?;

    let (items, total) = state.services.applications.list_applications(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// List the authenticated user's applications
#[utoipa::path(
    get,
    path = "/applications/mine",
    tag = "applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own applications", body = PaginatedResponse<Application>)
    )
)]
pub async fn my_applications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<PaginatedResponse<Application>>> {
    let query = ApplicationQuery {
        status: None,
        project_id: None,
        applicant_id: Some(claims.user_id),
        page: None,
        per_page: None,
    };
    let (items, total) = state.services.applications.list_applications(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: 1,
        per_page: 20,
    }))
}

/// Get application by ID
#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "applications",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application details", body = Application),
        (status = 404, description = "Application not found")
    )
)]
pub async fn get_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Application>> {
    let id = parse_id(&id, "application")?;
    let application = state.services.applications.get_application(id).await?;
    Ok(Json(application))
}

/// Submit an application for a project
#[utoipa::path(
    post,
    path = "/applications",
    tag = "applications",
    security(("bearer_auth" = [])),
    request_body = CreateApplication,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Already applied to this project")
    )
)]
pub async fn create_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateApplication>,
) -> AppResult<(StatusCode, Json<Application>)> {
    request.validate()?;

    let created = state
        .services
        .applications
        .create_application(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an application's status (project owner only)
#[utoipa::path(
    put,
    path = "/applications/{id}/status",
    tag = "applications",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatus,
    responses(
        (status = 200, description = "Status updated", body = Application),
        (status = 403, description = "Not the project owner"),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_application_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateApplicationStatus>,
) -> AppResult<Json<Application>> {
    request.validate()?;

    let id = parse_id(&id, "application")?;
    let updated = state
        .services
        .applications
        .update_status(id, claims.user_id, request)
        .await?;
    Ok(Json(updated))
}

/// Delete an application (applicant only)
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    tag = "applications",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Application ID")
    ),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn delete_application(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "application")?;
    state
        .services
        .applications
        .delete_application(id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
