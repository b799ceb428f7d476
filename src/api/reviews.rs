//! Review endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::review::{CreateReview, RatingSummary, Review, ReviewQuery, UpdateReview},
};

use super::{parse_id, AuthenticatedUser, PaginatedResponse};

/// List reviews with filters and pagination
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(ReviewQuery),
    responses(
        (status = 200, description = "List of reviews", body = PaginatedResponse<Review>)
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<PaginatedResponse<Review>>> {
    query.validate()?;

    let (items, total) = state.services.reviews.list_reviews(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get review by ID
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review details", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let id = parse_id(&id, "review")?;
    let review = state.services.reviews.get_review(id).await?;
    Ok(Json(review))
}

/// Create a review for a project the user participated in
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 403, description = "Reviewer was not part of the project"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Already reviewed this project")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    request.validate()?;

    let created = state
        .services
        .reviews
        .create_review(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a review (reviewer only; identity fields are immutable)
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 403, description = "Not the reviewer"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateReview>,
) -> AppResult<Json<Review>> {
    request.validate()?;

    let id = parse_id(&id, "review")?;
    let updated = state
        .services
        .reviews
        .update_review(id, claims.user_id, request)
        .await?;
    Ok(Json(updated))
}

/// Delete a review (reviewer only)
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the reviewer"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "review")?;
    state
        .services
        .reviews
        .delete_review(id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Average rating for a user, computed from stored reviews
#[utoipa::path(
    get,
    path = "/users/{id}/rating",
    tag = "reviews",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Rating summary", body = RatingSummary)
    )
)]
pub async fn user_rating(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RatingSummary>> {
    let id = parse_id(&id, "user")?;
    let summary = state.services.reviews.rating_summary(id).await?;
    Ok(Json(summary))
}
