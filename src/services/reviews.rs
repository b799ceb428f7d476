//! Peer review service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, RatingSummary, Review, ReviewQuery, UpdateReview},
    repository::{ProjectStore, ReviewStore},
};

#[derive(Clone)]
pub struct ReviewsService {
    reviews: Arc<dyn ReviewStore>,
    projects: Arc<dyn ProjectStore>,
}

impl ReviewsService {
    pub fn new(reviews: Arc<dyn ReviewStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self { reviews, projects }
    }

    /// List reviews with filters and pagination
    pub async fn list_reviews(&self, query: &ReviewQuery) -> AppResult<(Vec<Review>, i64)> {
        self.reviews.list(query).await
    }

    /// Get review by ID
    pub async fn get_review(&self, id: Uuid) -> AppResult<Review> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    /// Create a review. One per (project, reviewer) pair; the reviewer
    /// must have been part of the project and cannot review themselves.
    pub async fn create_review(&self, reviewer_id: Uuid, data: CreateReview) -> AppResult<Review> {
        let project = self
            .projects
            .find_by_id(data.project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", data.project_id)))?;

        let team = self.projects.team(project.id).await?;
        let was_participant =
            project.owner_id == reviewer_id || team.iter().any(|m| m.user_id == reviewer_id);
        if !was_participant {
            return Err(AppError::Authorization(
                "You must have been part of the project to leave a review".to_string(),
            ));
        }

        if data.reviewee_id == reviewer_id {
            return Err(AppError::BusinessRule(
                "You cannot review yourself".to_string(),
            ));
        }

        if self
            .reviews
            .find_by_pair(data.project_id, reviewer_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already reviewed this project".to_string(),
            ));
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            reviewer_id,
            reviewee_id: data.reviewee_id,
            rating: data.rating,
            title: data.title,
            comment: data.comment,
            would_work_again: data.would_work_again.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        // The (project, reviewer) unique constraint is the backstop
        self.reviews.insert(&review).await
    }

    /// Update a review (reviewer only). Identity fields stay fixed.
    pub async fn update_review(
        &self,
        id: Uuid,
        requester_id: Uuid,
        data: UpdateReview,
    ) -> AppResult<Review> {
        let mut review = self.get_review(id).await?;

        if review.reviewer_id != requester_id {
            return Err(AppError::Authorization(
                "Not authorized to update this review".to_string(),
            ));
        }

        if let Some(rating) = data.rating {
            review.rating = rating;
        }
        if let Some(title) = data.title {
            review.title = title;
        }
        if let Some(comment) = data.comment {
            review.comment = comment;
        }
        if let Some(again) = data.would_work_again {
            review.would_work_again = again;
        }
        review.updated_at = Utc::now();

        self.reviews.update(&review).await
    }

    /// Delete a review (reviewer only)
    pub async fn delete_review(&self, id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let review = self.get_review(id).await?;

        if review.reviewer_id != requester_id {
            return Err(AppError::Authorization(
                "Not authorized to delete this review".to_string(),
            ));
        }

        self.reviews.delete(id).await
    }

    /// Average rating for a user, computed from stored reviews on read
    pub async fn rating_summary(&self, reviewee_id: Uuid) -> AppResult<RatingSummary> {
        self.reviews.rating_summary(reviewee_id).await
    }
}
