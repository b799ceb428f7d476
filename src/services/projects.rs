//! Project and team membership service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::enums::{MembershipStatus, ProjectStatus},
    models::project::{
        CreateProject, Project, ProjectDetails, ProjectQuery, TeamMember, UpdateProject,
    },
    repository::{ProjectStore, UserStore},
};

#[derive(Clone)]
pub struct ProjectsService {
    projects: Arc<dyn ProjectStore>,
    users: Arc<dyn UserStore>,
}

impl ProjectsService {
    pub fn new(projects: Arc<dyn ProjectStore>, users: Arc<dyn UserStore>) -> Self {
        Self { projects, users }
    }

    /// List projects with filters and pagination
    pub async fn list_projects(&self, query: &ProjectQuery) -> AppResult<(Vec<Project>, i64)> {
        self.projects.list(query).await
    }

    /// Get project with its team ledger and derived sizes
    pub async fn get_project(&self, id: Uuid) -> AppResult<ProjectDetails> {
        let project = self.find_project(id).await?;
        let team = self.projects.team(id).await?;
        Ok(ProjectDetails::new(project, team))
    }

    /// Create a project owned by the requesting user
    pub async fn create_project(
        &self,
        owner_id: Uuid,
        data: CreateProject,
    ) -> AppResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            owner_id,
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or(ProjectStatus::Planning),
            category: data.category,
            max_team_size: data.max_team_size.unwrap_or(5),
            technologies: data.technologies.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.projects.insert(&project).await
    }

    /// Update a project (owner only)
    pub async fn update_project(
        &self,
        id: Uuid,
        requester_id: Uuid,
        data: UpdateProject,
    ) -> AppResult<Project> {
        let mut project = self.find_project(id).await?;
        require_owner(&project, requester_id)?;

        if let Some(title) = data.title {
            project.title = title;
        }
        if let Some(description) = data.description {
            project.description = description;
        }
        if let Some(category) = data.category {
            project.category = category;
        }
        if let Some(status) = data.status {
            project.status = status;
        }
        if let Some(max_team_size) = data.max_team_size {
            project.max_team_size = max_team_size;
        }
        if let Some(technologies) = data.technologies {
            project.technologies = technologies;
        }
        project.updated_at = Utc::now();

        self.projects.update(&project).await
    }

    /// Delete a project (owner only)
    pub async fn delete_project(&self, id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let project = self.find_project(id).await?;
        require_owner(&project, requester_id)?;
        self.projects.delete(id).await
    }

    /// Add a team member (owner only): one active entry per (project, user),
    /// active head-count bounded by `max_team_size`.
    pub async fn add_team_member(
        &self,
        project_id: Uuid,
        requester_id: Uuid,
        user_id: Uuid,
        role: String,
    ) -> AppResult<ProjectDetails> {
        let project = self.find_project(project_id).await?;
        require_owner(&project, requester_id)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let active = self.projects.active_team(project_id).await?;
        if active.iter().any(|m| m.user_id == user_id) {
            return Err(AppError::Conflict(
                "User is already a team member".to_string(),
            ));
        }
        if active.len() as i32 >= project.max_team_size {
            return Err(AppError::Capacity(
                "Project is at maximum team size".to_string(),
            ));
        }

        let entry = TeamMember::new(project_id, user_id, role, Utc::now());
        // Partial unique index on the active pair backs up the check above
        self.projects.insert_team_member(&entry).await?;

        tracing::info!(project_id = %project_id, user_id = %user_id, "team member added");

        self.get_project(project_id).await
    }

    /// Remove a team member (owner only): the entry transitions to
    /// `removed` and stays on the ledger.
    pub async fn remove_team_member(
        &self,
        project_id: Uuid,
        requester_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<ProjectDetails> {
        let project = self.find_project(project_id).await?;
        require_owner(&project, requester_id)?;

        let active = self.projects.active_team(project_id).await?;
        let entry = active
            .iter()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| {
                AppError::BusinessRule("User is not an active team member".to_string())
            })?;

        self.projects
            .set_membership_status(entry.id, MembershipStatus::Removed)
            .await?;

        tracing::info!(project_id = %project_id, user_id = %user_id, "team member removed");

        self.get_project(project_id).await
    }

    async fn find_project(&self, id: Uuid) -> AppResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }
}

fn require_owner(project: &Project, requester_id: Uuid) -> AppResult<()> {
    if project.owner_id == requester_id {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "Only the project owner may perform this action".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::UserRole;
    use crate::models::user::User;
    use crate::repository::memory::InMemoryStore;

    fn service() -> (ProjectsService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (ProjectsService::new(store.clone(), store.clone()), store)
    }

    async fn seed_user(store: &Arc<InMemoryStore>, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            role: UserRole::Member,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        UserStore::insert(store.as_ref(), &user).await.unwrap()
    }

    async fn seed_project(
        service: &ProjectsService,
        owner: Uuid,
        max_team_size: i32,
    ) -> Project {
        service
            .create_project(
                owner,
                CreateProject {
                    title: "Search engine".to_string(),
                    description: "A small search engine".to_string(),
                    category: "web-development".to_string(),
                    status: Some(ProjectStatus::Open),
                    max_team_size: Some(max_team_size),
                    technologies: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn team_fills_to_capacity_then_rejects() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let u2 = seed_user(&store, "u2@example.org").await;
        let u3 = seed_user(&store, "u3@example.org").await;
        let project = seed_project(&projects, owner.id, 2).await;

        projects
            .add_team_member(project.id, owner.id, u1.id, "dev".to_string())
            .await
            .unwrap();
        let details = projects
            .add_team_member(project.id, owner.id, u2.id, "dev".to_string())
            .await
            .unwrap();
        assert_eq!(details.current_team_size, 2);
        assert_eq!(details.available_spots, 0);

        let err = projects
            .add_team_member(project.id, owner.id, u3.id, "dev".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Capacity(_)));
    }

    #[tokio::test]
    async fn removal_frees_a_spot_but_keeps_history() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let u2 = seed_user(&store, "u2@example.org").await;
        let u3 = seed_user(&store, "u3@example.org").await;
        let project = seed_project(&projects, owner.id, 2).await;

        projects
            .add_team_member(project.id, owner.id, u1.id, "dev".to_string())
            .await
            .unwrap();
        projects
            .add_team_member(project.id, owner.id, u2.id, "dev".to_string())
            .await
            .unwrap();

        let details = projects
            .remove_team_member(project.id, owner.id, u1.id)
            .await
            .unwrap();
        assert_eq!(details.current_team_size, 1);
        // Removed entry survives on the ledger
        assert_eq!(details.team_members.len(), 2);

        projects
            .add_team_member(project.id, owner.id, u3.id, "dev".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_active_membership_is_rejected() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let project = seed_project(&projects, owner.id, 5).await;

        projects
            .add_team_member(project.id, owner.id, u1.id, "dev".to_string())
            .await
            .unwrap();
        let err = projects
            .add_team_member(project.id, owner.id, u1.id, "designer".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn rejoin_after_removal_is_allowed() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let project = seed_project(&projects, owner.id, 5).await;

        projects
            .add_team_member(project.id, owner.id, u1.id, "dev".to_string())
            .await
            .unwrap();
        projects
            .remove_team_member(project.id, owner.id, u1.id)
            .await
            .unwrap();
        let details = projects
            .add_team_member(project.id, owner.id, u1.id, "dev".to_string())
            .await
            .unwrap();

        assert_eq!(details.current_team_size, 1);
        assert_eq!(details.team_members.len(), 2);
    }

    #[tokio::test]
    async fn non_owner_cannot_manage_team() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let stranger = seed_user(&store, "stranger@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let project = seed_project(&projects, owner.id, 5).await;

        let err = projects
            .add_team_member(project.id, stranger.id, u1.id, "dev".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn remove_without_active_entry_is_a_rule_violation() {
        let (projects, store) = service();
        let owner = seed_user(&store, "owner@example.org").await;
        let u1 = seed_user(&store, "u1@example.org").await;
        let project = seed_project(&projects, owner.id, 5).await;

        let err = projects
            .remove_team_member(project.id, owner.id, u1.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }
}
