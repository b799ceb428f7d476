//! Book (library catalog) model and related types

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d{9}X|\d{10}|\d{13})$").unwrap());

pub const GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Fantasy",
    "Biography",
    "History",
    "Science",
    "Technology",
    "Self-Help",
    "Other",
];

/// Book model. `available_copies` is never stored: every read derives it
/// from the count of unreturned borrow records, so a borrow is a single
/// ledger insert and the capacity invariant cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: uuid::Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub published_year: i32,
    pub total_copies: i32,
    /// Derived: total_copies minus unreturned borrow records, clamped
    pub available_copies: i32,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub language: String,
    pub page_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Copies currently out on loan
    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }

    pub fn has_available_copies(&self) -> bool {
        self.available_copies > 0
    }
}

/// Derive the available-copy count from the active-ledger aggregate.
///
/// Clamped to `0..=total_copies` so the capacity invariant holds even if
/// `total_copies` was edited below the number of copies currently out.
pub fn available_copies(total_copies: i32, active_borrows: i64) -> i32 {
    (total_copies as i64 - active_borrows).clamp(0, total_copies.max(0) as i64) as i32
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: String,
    #[validate(regex(path = *ISBN_RE, message = "Please enter a valid ISBN"))]
    pub isbn: String,
    #[validate(custom(function = validate_genre))]
    pub genre: Option<String>,
    #[validate(range(min = 1000, message = "Please enter a valid year"))]
    pub published_year: i32,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: Option<i32>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Publisher cannot exceed 100 characters"))]
    pub publisher: Option<String>,
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Page count must be at least 1"))]
    pub page_count: Option<i32>,
}

/// Update book request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: Option<String>,
    #[validate(regex(path = *ISBN_RE, message = "Please enter a valid ISBN"))]
    pub isbn: Option<String>,
    #[validate(custom(function = validate_genre))]
    pub genre: Option<String>,
    #[validate(range(min = 1000, message = "Please enter a valid year"))]
    pub published_year: Option<i32>,
    #[validate(range(min = 1, message = "Total copies must be at least 1"))]
    pub total_copies: Option<i32>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Publisher cannot exceed 100 characters"))]
    pub publisher: Option<String>,
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Page count must be at least 1"))]
    pub page_count: Option<i32>,
}

/// Book list query parameters
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct BookQuery {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Per-page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}

fn validate_genre(genre: &str) -> Result<(), ValidationError> {
    if GENRES.contains(&genre) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_genre"))
    }
}

/// The published-year cap depends on the clock, so it lives outside the
/// derive-based validation
pub fn validate_published_year(year: i32, now: DateTime<Utc>) -> Result<(), String> {
    if year <= now.year() {
        Ok(())
    } else {
        Err("Published year cannot be in the future".to_string())
    }
}
