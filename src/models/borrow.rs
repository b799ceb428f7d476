//! Borrow ledger entry (library relationship ledger)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One borrow event. Append-only: a returned entry is terminal and a
/// re-borrow of the same book creates a fresh entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub book_id: uuid::Uuid,
    pub borrow_date: DateTime<Utc>,
    /// Always `borrow_date + loan period`; never set independently
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

impl BorrowRecord {
    /// Open a new ledger entry with the due date derived from the borrow date
    pub fn new(
        member_id: uuid::Uuid,
        book_id: uuid::Uuid,
        borrow_date: DateTime<Utc>,
        loan_period_days: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            member_id,
            book_id,
            borrow_date,
            due_date: borrow_date + Duration::days(loan_period_days),
            return_date: None,
            is_returned: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_returned
    }

    /// Overdue is a computed view, not a stored state
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_returned && self.due_date < now
    }
}

/// Borrow entry joined with book data for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowDetails {
    pub id: uuid::Uuid,
    pub book_id: uuid::Uuid,
    pub book_title: String,
    pub book_author: String,
    pub book_isbn: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
    pub is_overdue: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(days_ago: i64, period: i64) -> BorrowRecord {
        let borrowed = Utc::now() - Duration::days(days_ago);
        BorrowRecord::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), borrowed, period)
    }

    #[test]
    fn due_date_is_derived_from_borrow_date() {
        let record = entry(0, 14);
        assert_eq!(record.due_date - record.borrow_date, Duration::days(14));
        assert!(!record.is_returned);
        assert!(record.return_date.is_none());
    }

    #[test]
    fn entry_becomes_overdue_after_due_date() {
        let now = Utc::now();
        assert!(!entry(3, 14).is_overdue(now));
        assert!(entry(15, 14).is_overdue(now));
    }

    #[test]
    fn returned_entry_is_never_overdue() {
        let now = Utc::now();
        let mut record = entry(30, 14);
        record.is_returned = true;
        record.return_date = Some(now);
        assert!(!record.is_overdue(now));
        assert!(!record.is_active());
    }
}
