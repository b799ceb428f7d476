//! Books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery},
};

/// Storage port for the book catalog. `available_copies` is derived from
/// the borrow ledger by every implementation, never stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn isbn_exists(&self, isbn: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)>;
    async fn insert(&self, book: &Book) -> AppResult<Book>;
    async fn update(&self, book: &Book) -> AppResult<Book>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

// Availability is the ledger aggregate: total minus unreturned entries,
// clamped at zero (mirrors models::book::available_copies).
const BOOK_SELECT: &str = r#"
    SELECT b.*,
           GREATEST(b.total_copies - (
               SELECT COUNT(*) FROM borrow_records br
               WHERE br.book_id = b.id AND NOT br.is_returned
           ), 0)::INT4 AS available_copies
    FROM books b
"#;

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBooksRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn isbn_exists(&self, isbn: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(isbn)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1);
        let per_page = query.per_page.unwrap_or(10);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.genre.is_some() {
            conditions.push(format!("b.genre = ${}", idx));
            idx += 1;
        }
        if query.author.is_some() {
            conditions.push(format!("b.author ILIKE '%' || ${} || '%'", idx));
            idx += 1;
        }
        if query.title.is_some() {
            conditions.push(format!("b.title ILIKE '%' || ${} || '%'", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM books b {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref g) = query.genre { count_builder = count_builder.bind(g); }
        if let Some(ref a) = query.author { count_builder = count_builder.bind(a); }
        if let Some(ref t) = query.title { count_builder = count_builder.bind(t); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "{} {} ORDER BY b.created_at DESC LIMIT {} OFFSET {}",
            BOOK_SELECT, where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Book>(&select_q);
        if let Some(ref g) = query.genre { builder = builder.bind(g); }
        if let Some(ref a) = query.author { builder = builder.bind(a); }
        if let Some(ref t) = query.title { builder = builder.bind(t); }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, isbn, genre, published_year, total_copies,
                description, publisher, language, page_count, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.total_copies)
        .bind(&book.description)
        .bind(&book.publisher)
        .bind(&book.language)
        .bind(book.page_count)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        // Re-read so available_copies reflects the ledger
        self.find_by_id(book.id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Inserted book not found".to_string())
        })
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query(
            r#"
            UPDATE books SET
                title = $2, author = $3, isbn = $4, genre = $5, published_year = $6,
                total_copies = $7, description = $8, publisher = $9, language = $10,
                page_count = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.total_copies)
        .bind(&book.description)
        .bind(&book.publisher)
        .bind(&book.language)
        .bind(book.page_count)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(book.id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Updated book not found".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
