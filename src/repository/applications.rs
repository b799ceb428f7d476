//! Applications repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::application::{Application, ApplicationQuery},
};

/// Storage port for project applications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>>;
    /// Lookup by the unique (project, applicant) pair
    async fn find_by_pair(
        &self,
        project_id: Uuid,
        applicant_id: Uuid,
    ) -> AppResult<Option<Application>>;
    async fn list(&self, query: &ApplicationQuery) -> AppResult<(Vec<Application>, i64)>;
    async fn insert(&self, application: &Application) -> AppResult<Application>;
    async fn update(&self, application: &Application) -> AppResult<Application>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgApplicationsRepository {
    pool: Pool<Postgres>,
}

impl PgApplicationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationsRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        let app = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(app)
    }

    async fn find_by_pair(
        &self,
        project_id: Uuid,
        applicant_id: Uuid,
    ) -> AppResult<Option<Application>> {
        let app = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE project_id = $1 AND applicant_id = $2",
        )
        .bind(project_id)
        .bind(applicant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(app)
    }

    async fn list(&self, query: &ApplicationQuery) -> AppResult<(Vec<Application>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(20);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if query.project_id.is_some() {
            conditions.push(format!("project_id = ${}", idx));
            idx += 1;
        }
        if query.applicant_id.is_some() {
            conditions.push(format!("applicant_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM applications {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(status) = query.status { count_builder = count_builder.bind(status); }
        if let Some(p) = query.project_id { count_builder = count_builder.bind(p); }
        if let Some(a) = query.applicant_id { count_builder = count_builder.bind(a); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM applications {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Application>(&select_q);
        if let Some(status) = query.status { builder = builder.bind(status); }
        if let Some(p) = query.project_id { builder = builder.bind(p); }
        if let Some(a) = query.applicant_id { builder = builder.bind(a); }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn insert(&self, application: &Application) -> AppResult<Application> {
        let row = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                id, project_id, applicant_id, cover_letter, proposed_role,
                status, reviewed_by, reviewed_at, review_notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(application.project_id)
        .bind(application.applicant_id)
        .bind(&application.cover_letter)
        .bind(&application.proposed_role)
        .bind(application.status)
        .bind(application.reviewed_by)
        .bind(application.reviewed_at)
        .bind(&application.review_notes)
        .bind(application.created_at)
        .bind(application.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, application: &Application) -> AppResult<Application> {
        let row = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET
                cover_letter = $2, proposed_role = $3, status = $4,
                reviewed_by = $5, reviewed_at = $6, review_notes = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(&application.cover_letter)
        .bind(&application.proposed_role)
        .bind(application.status)
        .bind(application.reviewed_by)
        .bind(application.reviewed_at)
        .bind(&application.review_notes)
        .bind(application.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
