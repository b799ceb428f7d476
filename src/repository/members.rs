//! Members repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::member::{Member, MemberQuery},
};

/// Storage port for library members
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>>;
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    async fn list(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)>;
    async fn insert(&self, member: &Member) -> AppResult<Member>;
    async fn update(&self, member: &Member) -> AppResult<Member>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgMembersRepository {
    pool: Pool<Postgres>,
}

impl PgMembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMembersRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1) AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(10);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.membership_type.is_some() {
            conditions.push(format!("membership_type = ${}", idx));
            idx += 1;
        }
        if query.is_active.is_some() {
            conditions.push(format!("is_active = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM members {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(mt) = query.membership_type { count_builder = count_builder.bind(mt); }
        if let Some(active) = query.is_active { count_builder = count_builder.bind(active); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM members {} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Member>(&select_q);
        if let Some(mt) = query.membership_type { builder = builder.bind(mt); }
        if let Some(active) = query.is_active { builder = builder.bind(active); }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn insert(&self, member: &Member) -> AppResult<Member> {
        let row = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (
                id, first_name, last_name, email, phone, street, city, state,
                zip_code, membership_date, membership_type, is_active, fines,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(member.id)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.street)
        .bind(&member.city)
        .bind(&member.state)
        .bind(&member.zip_code)
        .bind(member.membership_date)
        .bind(member.membership_type)
        .bind(member.is_active)
        .bind(member.fines)
        .bind(member.created_at)
        .bind(member.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, member: &Member) -> AppResult<Member> {
        let row = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members SET
                first_name = $2, last_name = $3, email = $4, phone = $5,
                street = $6, city = $7, state = $8, zip_code = $9,
                membership_type = $10, is_active = $11, fines = $12, updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(member.id)
        .bind(&member.first_name)
        .bind(&member.last_name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.street)
        .bind(&member.city)
        .bind(&member.state)
        .bind(&member.zip_code)
        .bind(member.membership_type)
        .bind(member.is_active)
        .bind(member.fines)
        .bind(member.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
