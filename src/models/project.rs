//! Project model and team membership ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::enums::{MembershipStatus, ProjectStatus};

pub const CATEGORIES: &[&str] = &[
    "web-development",
    "mobile-development",
    "data-science",
    "machine-learning",
    "devops",
    "blockchain",
    "game-development",
    "other",
];

/// Marketplace project (catalog side of the team ledger)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Project {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub category: String,
    pub max_team_size: i32,
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team membership ledger entry. Removal is a status transition, never a
/// row delete, so history survives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamMember {
    pub id: uuid::Uuid,
    pub project_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub status: MembershipStatus,
}

impl TeamMember {
    pub fn new(
        project_id: uuid::Uuid,
        user_id: uuid::Uuid,
        role: String,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            project_id,
            user_id,
            role,
            joined_at,
            status: MembershipStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// Active head-count over the membership ledger
pub fn current_team_size(team: &[TeamMember]) -> usize {
    team.iter().filter(|m| m.is_active()).count()
}

/// Remaining open spots, never negative
pub fn available_spots(max_team_size: i32, team: &[TeamMember]) -> i32 {
    (max_team_size as i64 - current_team_size(team) as i64).max(0) as i32
}

/// Project with its team ledger and derived sizes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectDetails {
    pub project: Project,
    pub team_members: Vec<TeamMember>,
    pub current_team_size: usize,
    pub available_spots: i32,
}

impl ProjectDetails {
    pub fn new(project: Project, team_members: Vec<TeamMember>) -> Self {
        let size = current_team_size(&team_members);
        let spots = available_spots(project.max_team_size, &team_members);
        Self {
            project,
            team_members,
            current_team_size: size,
            available_spots: spots,
        }
    }
}

/// Create project request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 1, max = 20, message = "Team size must be between 1 and 20"))]
    pub max_team_size: Option<i32>,
    pub technologies: Option<Vec<String>>,
}

/// Update project request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = validate_category))]
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 1, max = 20, message = "Team size must be between 1 and 20"))]
    pub max_team_size: Option<i32>,
    pub technologies: Option<Vec<String>>,
}

/// Project list query parameters
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub category: Option<String>,
    pub owner_id: Option<uuid::Uuid>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Per-page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_category"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(statuses: &[MembershipStatus]) -> Vec<TeamMember> {
        statuses
            .iter()
            .map(|s| {
                let mut m = TeamMember::new(
                    uuid::Uuid::new_v4(),
                    uuid::Uuid::new_v4(),
                    "developer".to_string(),
                    Utc::now(),
                );
                m.status = *s;
                m
            })
            .collect()
    }

    #[test]
    fn team_size_counts_only_active_entries() {
        let team = ledger(&[
            MembershipStatus::Active,
            MembershipStatus::Removed,
            MembershipStatus::Active,
            MembershipStatus::Inactive,
        ]);
        assert_eq!(current_team_size(&team), 2);
    }

    #[test]
    fn available_spots_never_goes_negative() {
        let team = ledger(&[MembershipStatus::Active, MembershipStatus::Active]);
        assert_eq!(available_spots(5, &team), 3);
        assert_eq!(available_spots(2, &team), 0);
        assert_eq!(available_spots(1, &team), 0);
    }

    #[test]
    fn removed_entries_do_not_occupy_capacity() {
        let team = ledger(&[
            MembershipStatus::Removed,
            MembershipStatus::Removed,
            MembershipStatus::Removed,
        ]);
        assert_eq!(available_spots(2, &team), 2);
    }
}
