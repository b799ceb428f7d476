//! Project application model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ApplicationStatus;

/// Application to join a project, unique per (project, applicant) pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Application {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub applicant_id: uuid::Uuid,
    pub cover_letter: String,
    pub proposed_role: String,
    pub status: ApplicationStatus,
    /// Stamped on the first transition away from pending, immutable after
    pub reviewed_by: Option<uuid::Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(
        project_id: uuid::Uuid,
        applicant_id: uuid::Uuid,
        cover_letter: String,
        proposed_role: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            project_id,
            applicant_id,
            cover_letter,
            proposed_role,
            status: ApplicationStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the status, stamping the reviewer on the first move only.
    /// Rejects any transition targeting `pending`.
    pub fn transition(
        &mut self,
        target: ApplicationStatus,
        reviewer: uuid::Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        if !self.status.allows_transition_to(target) {
            return Err(format!(
                "Cannot move application from {} to {}",
                self.status, target
            ));
        }
        self.status = target;
        if self.reviewed_by.is_none() {
            self.reviewed_by = Some(reviewer);
            self.reviewed_at = Some(now);
        }
        if notes.is_some() {
            self.review_notes = notes;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Create application request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateApplication {
    pub project_id: uuid::Uuid,
    #[validate(length(min = 1, max = 2000, message = "Cover letter must be 1-2000 characters"))]
    pub cover_letter: String,
    #[validate(length(min = 1, max = 100, message = "Proposed role must be 1-100 characters"))]
    pub proposed_role: String,
}

/// Status update request (project owner only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationStatus {
    pub status: ApplicationStatus,
    #[validate(length(max = 1000, message = "Review notes cannot exceed 1000 characters"))]
    pub review_notes: Option<String>,
}

/// Application list query parameters
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub project_id: Option<uuid::Uuid>,
    pub applicant_id: Option<uuid::Uuid>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Per-page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}
