//! Borrow ledger repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowRecord},
};

/// Storage port for the borrow ledger
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowStore: Send + Sync {
    /// The unreturned entry for a (member, book) pair, if any
    async fn active_entry(&self, member_id: Uuid, book_id: Uuid)
        -> AppResult<Option<BorrowRecord>>;
    async fn active_count_for_book(&self, book_id: Uuid) -> AppResult<i64>;
    async fn active_count_for_member(&self, member_id: Uuid) -> AppResult<i64>;
    /// Whether any ledger entry, returned or not, references the book
    async fn history_exists_for_book(&self, book_id: Uuid) -> AppResult<bool>;
    async fn insert(&self, record: &BorrowRecord) -> AppResult<BorrowRecord>;
    async fn mark_returned(&self, entry_id: Uuid, returned_at: DateTime<Utc>)
        -> AppResult<BorrowRecord>;
    /// Full ledger for a member joined with book data
    async fn list_for_member(&self, member_id: Uuid) -> AppResult<Vec<BorrowDetails>>;
}

#[derive(Clone)]
pub struct PgBorrowsRepository {
    pool: Pool<Postgres>,
}

impl PgBorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowStore for PgBorrowsRepository {
    async fn active_entry(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE member_id = $1 AND book_id = $2 AND NOT is_returned",
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn active_count_for_book(&self, book_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = $1 AND NOT is_returned",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn active_count_for_member(&self, member_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE member_id = $1 AND NOT is_returned",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn history_exists_for_book(&self, book_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE book_id = $1)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, record: &BorrowRecord) -> AppResult<BorrowRecord> {
        let row = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (
                id, member_id, book_id, borrow_date, due_date, return_date, is_returned
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.member_id)
        .bind(record.book_id)
        .bind(record.borrow_date)
        .bind(record.due_date)
        .bind(record.return_date)
        .bind(record.is_returned)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn mark_returned(
        &self,
        entry_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        // The filter keeps returned entries terminal even if two requests race
        sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records
            SET return_date = $2, is_returned = TRUE
            WHERE id = $1 AND NOT is_returned
            RETURNING *
            "#,
        )
        .bind(entry_id)
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Entry is already returned".to_string()))
    }

    async fn list_for_member(&self, member_id: Uuid) -> AppResult<Vec<BorrowDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT br.id, br.book_id, br.borrow_date, br.due_date,
                   br.return_date, br.is_returned,
                   b.title AS book_title, b.author AS book_author, b.isbn AS book_isbn
            FROM borrow_records br
            JOIN books b ON br.book_id = b.id
            WHERE br.member_id = $1
            ORDER BY br.borrow_date DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        let now = Utc::now();
        let mut result = Vec::new();
        for row in rows {
            let due_date: DateTime<Utc> = row.get("due_date");
            let is_returned: bool = row.get("is_returned");
            result.push(BorrowDetails {
                id: row.get("id"),
                book_id: row.get("book_id"),
                book_title: row.get("book_title"),
                book_author: row.get("book_author"),
                book_isbn: row.get("book_isbn"),
                borrow_date: row.get("borrow_date"),
                due_date,
                return_date: row.get("return_date"),
                is_returned,
                is_overdue: !is_returned && due_date < now,
            });
        }
        Ok(result)
    }
}
