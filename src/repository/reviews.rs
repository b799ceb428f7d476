//! Reviews repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::review::{RatingSummary, Review, ReviewQuery},
};

/// Storage port for peer reviews
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;
    /// Lookup by the unique (project, reviewer) pair
    async fn find_by_pair(
        &self,
        project_id: Uuid,
        reviewer_id: Uuid,
    ) -> AppResult<Option<Review>>;
    async fn list(&self, query: &ReviewQuery) -> AppResult<(Vec<Review>, i64)>;
    async fn insert(&self, review: &Review) -> AppResult<Review>;
    async fn update(&self, review: &Review) -> AppResult<Review>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Average rating across all reviews about a user, computed on read
    async fn rating_summary(&self, reviewee_id: Uuid) -> AppResult<RatingSummary>;
}

#[derive(Clone)]
pub struct PgReviewsRepository {
    pool: Pool<Postgres>,
}

impl PgReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewsRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(review)
    }

    async fn find_by_pair(
        &self,
        project_id: Uuid,
        reviewer_id: Uuid,
    ) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE project_id = $1 AND reviewer_id = $2",
        )
        .bind(project_id)
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn list(&self, query: &ReviewQuery) -> AppResult<(Vec<Review>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(20);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.project_id.is_some() {
            conditions.push(format!("project_id = ${}", idx));
            idx += 1;
        }
        if query.reviewee_id.is_some() {
            conditions.push(format!("reviewee_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM reviews {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(p) = query.project_id { count_builder = count_builder.bind(p); }
        if let Some(r) = query.reviewee_id { count_builder = count_builder.bind(r); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM reviews {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Review>(&select_q);
        if let Some(p) = query.project_id { builder = builder.bind(p); }
        if let Some(r) = query.reviewee_id { builder = builder.bind(r); }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn insert(&self, review: &Review) -> AppResult<Review> {
        let row = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                id, project_id, reviewer_id, reviewee_id, rating, title,
                comment, would_work_again, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.project_id)
        .bind(review.reviewer_id)
        .bind(review.reviewee_id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.comment)
        .bind(review.would_work_again)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, review: &Review) -> AppResult<Review> {
        // Identity columns (project, reviewer, reviewee) are intentionally
        // not part of the update set.
        let row = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET
                rating = $2, title = $3, comment = $4,
                would_work_again = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.comment)
        .bind(review.would_work_again)
        .bind(review.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn rating_summary(&self, reviewee_id: Uuid) -> AppResult<RatingSummary> {
        let row = sqlx::query(
            "SELECT COALESCE(AVG(rating), 0)::FLOAT8 AS average, COUNT(*) AS total
             FROM reviews WHERE reviewee_id = $1",
        )
        .bind(reviewee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary {
            reviewee_id,
            average_rating: row.get("average"),
            total_reviews: row.get("total"),
        })
    }
}
