//! Peer review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Review left by one project participant about another, unique per
/// (project, reviewer) pair. Project/reviewer/reviewee are fixed at
/// creation; updates may only touch rating, title, comment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub reviewer_id: uuid::Uuid,
    pub reviewee_id: uuid::Uuid,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub would_work_again: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating for a reviewee, computed on read
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingSummary {
    pub reviewee_id: uuid::Uuid,
    pub average_rating: f64,
    pub total_reviews: i64,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub project_id: uuid::Uuid,
    pub reviewee_id: uuid::Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub comment: String,
    pub would_work_again: Option<bool>,
}

/// Update review request; identity fields are deliberately absent
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub comment: Option<String>,
    pub would_work_again: Option<bool>,
}

/// Review list query parameters
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ReviewQuery {
    pub project_id: Option<uuid::Uuid>,
    pub reviewee_id: Option<uuid::Uuid>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Per-page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}
