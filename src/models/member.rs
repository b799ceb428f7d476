//! Library member model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::borrow::BorrowDetails;
use super::enums::MembershipType;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").unwrap());
static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());

/// Library member (actor side of the borrow ledger)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub membership_date: DateTime<Utc>,
    pub membership_type: MembershipType,
    pub is_active: bool,
    pub fines: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Member with their borrow ledger and the counts derived from it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberDetails {
    pub member: Member,
    pub borrows: Vec<BorrowDetails>,
    /// Unreturned entries
    pub current_borrowed_count: usize,
    /// Unreturned entries past their due date
    pub overdue_count: usize,
}

/// Create member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMember {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Please enter a valid phone number"))]
    pub phone: String,
    #[validate(length(max = 100, message = "Street cannot exceed 100 characters"))]
    pub street: Option<String>,
    #[validate(length(max = 50, message = "City cannot exceed 50 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 50, message = "State cannot exceed 50 characters"))]
    pub state: Option<String>,
    #[validate(regex(path = *ZIP_RE, message = "Please enter a valid ZIP code"))]
    pub zip_code: Option<String>,
    pub membership_type: Option<MembershipType>,
}

/// Update member request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Please enter a valid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Street cannot exceed 100 characters"))]
    pub street: Option<String>,
    #[validate(length(max = 50, message = "City cannot exceed 50 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 50, message = "State cannot exceed 50 characters"))]
    pub state: Option<String>,
    #[validate(regex(path = *ZIP_RE, message = "Please enter a valid ZIP code"))]
    pub zip_code: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0.0, message = "Fines cannot be negative"))]
    pub fines: Option<f64>,
}

/// Member list query parameters
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct MemberQuery {
    pub membership_type: Option<MembershipType>,
    pub is_active: Option<bool>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Per-page must be between 1 and 100"))]
    pub per_page: Option<i64>,
}
