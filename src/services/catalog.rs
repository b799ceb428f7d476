//! Book catalog service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::{BookStore, BorrowStore},
};

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookStore>,
    borrows: Arc<dyn BorrowStore>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookStore>, borrows: Arc<dyn BorrowStore>) -> Self {
        Self { books, borrows }
    }

    /// List books with filters and pagination
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.books.list(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a new book
    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let now = Utc::now();
        crate::models::book::validate_published_year(data.published_year, now)
            .map_err(AppError::Validation)?;

        if self.books.isbn_exists(&data.isbn, None).await? {
            return Err(AppError::Conflict(
                "Book with this ISBN already exists".to_string(),
            ));
        }

        let total_copies = data.total_copies.unwrap_or(1);
        let book = Book {
            id: Uuid::new_v4(),
            title: data.title,
            author: data.author,
            isbn: data.isbn,
            genre: data.genre.unwrap_or_else(|| "Other".to_string()),
            published_year: data.published_year,
            total_copies,
            available_copies: total_copies,
            description: data.description,
            publisher: data.publisher,
            language: data.language.unwrap_or_else(|| "English".to_string()),
            page_count: data.page_count,
            created_at: now,
            updated_at: now,
        };
        self.books.insert(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: Uuid, data: UpdateBook) -> AppResult<Book> {
        let mut book = self.get_book(id).await?;

        if let Some(ref isbn) = data.isbn {
            if self.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
            book.isbn = isbn.clone();
        }
        if let Some(title) = data.title {
            book.title = title;
        }
        if let Some(author) = data.author {
            book.author = author;
        }
        if let Some(genre) = data.genre {
            book.genre = genre;
        }
        if let Some(year) = data.published_year {
            crate::models::book::validate_published_year(year, Utc::now())
                .map_err(AppError::Validation)?;
            book.published_year = year;
        }
        if let Some(total) = data.total_copies {
            book.total_copies = total;
        }
        if let Some(description) = data.description {
            book.description = Some(description);
        }
        if let Some(publisher) = data.publisher {
            book.publisher = Some(publisher);
        }
        if let Some(language) = data.language {
            book.language = language;
        }
        if let Some(pages) = data.page_count {
            book.page_count = Some(pages);
        }
        book.updated_at = Utc::now();

        self.books.update(&book).await
    }

    /// Delete a book. A book referenced by any borrow ledger entry is
    /// never hard-deleted.
    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.get_book(id).await?;

        if self.borrows.history_exists_for_book(id).await? {
            return Err(AppError::BusinessRule(
                "Cannot delete a book referenced by borrow records".to_string(),
            ));
        }
        self.books.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryStore;

    fn service() -> (CatalogService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (
            CatalogService::new(store.clone(), store.clone()),
            store,
        )
    }

    fn new_book(isbn: &str) -> CreateBook {
        CreateBook {
            title: "The Mythical Man-Month".to_string(),
            author: "Frederick Brooks".to_string(),
            isbn: isbn.to_string(),
            genre: None,
            published_year: 1975,
            total_copies: Some(2),
            description: None,
            publisher: None,
            language: None,
            page_count: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_genre_and_availability() {
        let (catalog, _) = service();
        let book = catalog.create_book(new_book("9780201835953")).await.unwrap();
        assert_eq!(book.genre, "Other");
        assert_eq!(book.total_copies, 2);
        assert_eq!(book.available_copies, 2);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let (catalog, _) = service();
        catalog.create_book(new_book("9780201835953")).await.unwrap();
        let err = catalog.create_book(new_book("9780201835953")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_refused_once_ledger_references_book() {
        let (catalog, store) = service();
        let book = catalog.create_book(new_book("9780201835953")).await.unwrap();

        let record = crate::models::BorrowRecord::new(
            Uuid::new_v4(),
            book.id,
            Utc::now(),
            14,
        );
        crate::repository::BorrowStore::insert(store.as_ref(), &record)
            .await
            .unwrap();

        let err = catalog.delete_book(book.id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }
}
