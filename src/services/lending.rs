//! Borrow/return service
//!
//! The borrow ledger is the sole source of truth: availability is derived
//! from it on read, so each operation here is a single ledger write and
//! the capacity invariant cannot drift between two entities.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::book::Book,
    models::borrow::{BorrowDetails, BorrowRecord},
    models::member::Member,
    repository::{BookStore, BorrowStore, MemberStore},
};

/// Snapshot returned by a borrow or return, with the book re-read so its
/// derived availability reflects the ledger change
#[derive(Debug, Clone)]
pub struct LendingOutcome {
    pub record: BorrowRecord,
    pub member: Member,
    pub book: Book,
}

#[derive(Clone)]
pub struct LendingService {
    members: Arc<dyn MemberStore>,
    books: Arc<dyn BookStore>,
    borrows: Arc<dyn BorrowStore>,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(
        members: Arc<dyn MemberStore>,
        books: Arc<dyn BookStore>,
        borrows: Arc<dyn BorrowStore>,
        config: LendingConfig,
    ) -> Self {
        Self {
            members,
            books,
            borrows,
            config,
        }
    }

    /// Borrow a book: append a ledger entry with the due date derived from
    /// the borrow date.
    ///
    /// Fails when the member or book is missing, when the member already
    /// holds an unreturned copy of this book, or when no copies are left.
    pub async fn borrow(&self, member_id: Uuid, book_id: Uuid) -> AppResult<LendingOutcome> {
        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
        let book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        if self.borrows.active_entry(member_id, book_id).await?.is_some() {
            return Err(AppError::Conflict(
                "Member has already borrowed this book".to_string(),
            ));
        }

        if !book.has_available_copies() {
            return Err(AppError::Capacity(
                "No copies available for borrowing".to_string(),
            ));
        }

        let record = BorrowRecord::new(
            member_id,
            book_id,
            Utc::now(),
            self.config.loan_period_days,
        );
        // The partial unique index backs this up if a concurrent request
        // passed the same active-entry check.
        let record = self.borrows.insert(&record).await?;

        tracing::info!(
            member_id = %member_id,
            book_id = %book_id,
            due_date = %record.due_date,
            "book borrowed"
        );

        let book = self.snapshot_book(book_id).await?;
        Ok(LendingOutcome { record, member, book })
    }

    /// Return a book: close the active ledger entry for the pair.
    pub async fn return_book(&self, member_id: Uuid, book_id: Uuid) -> AppResult<LendingOutcome> {
        let member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
        self.books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))?;

        let entry = self
            .borrows
            .active_entry(member_id, book_id)
            .await?
            .ok_or_else(|| {
                AppError::BusinessRule(
                    "Book was not borrowed by this member or already returned".to_string(),
                )
            })?;

        let record = self.borrows.mark_returned(entry.id, Utc::now()).await?;

        tracing::info!(member_id = %member_id, book_id = %book_id, "book returned");

        let book = self.snapshot_book(book_id).await?;
        Ok(LendingOutcome { record, member, book })
    }

    /// Full borrow ledger for a member, overdue flags computed on read
    pub async fn member_borrows(&self, member_id: Uuid) -> AppResult<Vec<BorrowDetails>> {
        self.members
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;
        self.borrows.list_for_member(member_id).await
    }

    async fn snapshot_book(&self, book_id: Uuid) -> AppResult<Book> {
        self.books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
    }
}
