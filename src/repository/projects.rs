//! Projects and team membership repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::enums::MembershipStatus,
    models::project::{Project, ProjectQuery, TeamMember},
};

/// Storage port for projects and their team membership ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>>;
    async fn list(&self, query: &ProjectQuery) -> AppResult<(Vec<Project>, i64)>;
    async fn insert(&self, project: &Project) -> AppResult<Project>;
    async fn update(&self, project: &Project) -> AppResult<Project>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Full membership ledger, all statuses
    async fn team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>>;
    async fn active_team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>>;
    async fn insert_team_member(&self, member: &TeamMember) -> AppResult<TeamMember>;
    async fn set_membership_status(
        &self,
        entry_id: Uuid,
        status: MembershipStatus,
    ) -> AppResult<TeamMember>;
}

#[derive(Clone)]
pub struct PgProjectsRepository {
    pool: Pool<Postgres>,
}

impl PgProjectsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectsRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn list(&self, query: &ProjectQuery) -> AppResult<(Vec<Project>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(10);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if query.category.is_some() {
            conditions.push(format!("category = ${}", idx));
            idx += 1;
        }
        if query.owner_id.is_some() {
            conditions.push(format!("owner_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM projects {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(status) = query.status { count_builder = count_builder.bind(status); }
        if let Some(ref c) = query.category { count_builder = count_builder.bind(c); }
        if let Some(owner) = query.owner_id { count_builder = count_builder.bind(owner); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM projects {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Project>(&select_q);
        if let Some(status) = query.status { builder = builder.bind(status); }
        if let Some(ref c) = query.category { builder = builder.bind(c); }
        if let Some(owner) = query.owner_id { builder = builder.bind(owner); }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn insert(&self, project: &Project) -> AppResult<Project> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                id, owner_id, title, description, status, category,
                max_team_size, technologies, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.status)
        .bind(&project.category)
        .bind(project.max_team_size)
        .bind(&project.technologies)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, project: &Project) -> AppResult<Project> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                title = $2, description = $3, status = $4, category = $5,
                max_team_size = $6, technologies = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.status)
        .bind(&project.category)
        .bind(project.max_team_size)
        .bind(&project.technologies)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE project_id = $1 ORDER BY joined_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn active_team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE project_id = $1 AND status = 'active' ORDER BY joined_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_team_member(&self, member: &TeamMember) -> AppResult<TeamMember> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (id, project_id, user_id, role, joined_at, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(member.id)
        .bind(member.project_id)
        .bind(member.user_id)
        .bind(&member.role)
        .bind(member.joined_at)
        .bind(member.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_membership_status(
        &self,
        entry_id: Uuid,
        status: MembershipStatus,
    ) -> AppResult<TeamMember> {
        sqlx::query_as::<_, TeamMember>(
            "UPDATE team_members SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(entry_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Team membership entry not found".to_string()))
    }
}
