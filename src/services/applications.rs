//! Project application service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::application::{
        Application, ApplicationQuery, CreateApplication, UpdateApplicationStatus,
    },
    repository::{ApplicationStore, ProjectStore},
};

#[derive(Clone)]
pub struct ApplicationsService {
    applications: Arc<dyn ApplicationStore>,
    projects: Arc<dyn ProjectStore>,
}

impl ApplicationsService {
    pub fn new(applications: Arc<dyn ApplicationStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            applications,
            projects,
        }
    }

    /// List applications with filters and pagination
    pub async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> AppResult<(Vec<Application>, i64)> {
        self.applications.list(query).await
    }

    /// Get application by ID
    pub async fn get_application(&self, id: Uuid) -> AppResult<Application> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))
    }

    /// Submit an application. One per (project, applicant) pair.
    pub async fn create_application(
        &self,
        applicant_id: Uuid,
        data: CreateApplication,
    ) -> AppResult<Application> {
        self.projects
            .find_by_id(data.project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", data.project_id)))?;

        if self
            .applications
            .find_by_pair(data.project_id, applicant_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "You have already applied to this project".to_string(),
            ));
        }

        let application = Application::new(
            data.project_id,
            applicant_id,
            data.cover_letter,
            data.proposed_role,
            Utc::now(),
        );
        // The (project, applicant) unique constraint is the backstop for
        // two submissions racing past the pair check.
        self.applications.insert(&application).await
    }

    /// Move the application status (project owner only). The reviewer is
    /// stamped on the first move away from pending; no move ever targets
    /// pending again.
    pub async fn update_status(
        &self,
        id: Uuid,
        requester_id: Uuid,
        data: UpdateApplicationStatus,
    ) -> AppResult<Application> {
        let mut application = self.get_application(id).await?;

        let project = self
            .projects
            .find_by_id(application.project_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Project {} not found", application.project_id))
            })?;

        if project.owner_id != requester_id {
            return Err(AppError::Authorization(
                "Only the project owner can update application status".to_string(),
            ));
        }

        application
            .transition(data.status, requester_id, data.review_notes, Utc::now())
            .map_err(AppError::BusinessRule)?;

        tracing::info!(
            application_id = %id,
            status = %application.status,
            "application status updated"
        );

        self.applications.update(&application).await
    }

    /// Withdraw an application entirely (applicant only)
    pub async fn delete_application(&self, id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let application = self.get_application(id).await?;

        if application.applicant_id != requester_id {
            return Err(AppError::Authorization(
                "Not authorized to delete this application".to_string(),
            ));
        }

        self.applications.delete(id).await
    }
}
