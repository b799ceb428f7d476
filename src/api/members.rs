//! Member management and borrow/return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::borrow::BorrowDetails,
    models::member::{CreateMember, Member, MemberDetails, MemberQuery, UpdateMember},
};

use super::{parse_id, AuthenticatedUser, PaginatedResponse};

/// Borrow response with the derived due date and availability
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Borrowing member's full name
    pub member: String,
    /// Book title
    pub book: String,
    /// Due date (ISO 8601 format)
    pub due_date: DateTime<Utc>,
    /// Copies still available after this borrow
    pub available_copies: i32,
    /// Status message
    pub message: String,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Returning member's full name
    pub member: String,
    /// Book title
    pub book: String,
    /// Return date (ISO 8601 format)
    pub return_date: DateTime<Utc>,
    /// Copies available after this return
    pub available_copies: i32,
    /// Status message
    pub message: String,
}

/// List members with filters and pagination
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    params(MemberQuery),
    responses(
        (status = 200, description = "List of members", body = PaginatedResponse<Member>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<PaginatedResponse<Member>>> {
    claims.require_admin()?;
    query.validate()?;

    let (items, total) = state.services.members.list_members(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(10),
    }))
}

/// Get member with their borrow ledger
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = MemberDetails),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MemberDetails>> {
    claims.require_admin()?;

    let id = parse_id(&id, "member")?;
    let details = state.services.members.get_member_details(id).await?;
    Ok(Json(details))
}

/// Create a new member (admin only)
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    security(("bearer_auth" = [])),
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Member with this email already exists")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<Member>)> {
    claims.require_admin()?;
    request.validate()?;

    let created = state.services.members.create_member(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing member (admin only)
#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    request_body = UpdateMember,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member with this email already exists")
    )
)]
pub async fn update_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateMember>,
) -> AppResult<Json<Member>> {
    claims.require_admin()?;
    request.validate()?;

    let id = parse_id(&id, "member")?;
    let updated = state.services.members.update_member(id, request).await?;
    Ok(Json(updated))
}

/// Delete a member (admin only). Refused while books are unreturned.
#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "Member not found"),
        (status = 422, description = "Member has unreturned books")
    )
)]
pub async fn delete_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    let id = parse_id(&id, "member")?;
    state.services.members.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a member's borrow ledger
#[utoipa::path(
    get,
    path = "/members/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member's borrow records", body = Vec<BorrowDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn list_member_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_admin()?;

    let id = parse_id(&id, "member")?;
    let borrows = state.services.lending.member_borrows(id).await?;
    Ok(Json(borrows))
}

/// Borrow a book for a member
#[utoipa::path(
    post,
    path = "/members/{member_id}/borrow/{book_id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("member_id" = String, Path, description = "Member ID"),
        ("book_id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed", body = BorrowResponse),
        (status = 404, description = "Member or book not found"),
        (status = 409, description = "No copies available or already borrowed")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((member_id, book_id)): Path<(String, String)>,
) -> AppResult<Json<BorrowResponse>> {
    claims.require_admin()?;

    let member_id = parse_id(&member_id, "member")?;
    let book_id = parse_id(&book_id, "book")?;

    let outcome = state.services.lending.borrow(member_id, book_id).await?;

    Ok(Json(BorrowResponse {
        member: outcome.member.full_name(),
        book: outcome.book.title,
        due_date: outcome.record.due_date,
        available_copies: outcome.book.available_copies,
        message: "Book borrowed successfully".to_string(),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/members/{member_id}/return/{book_id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("member_id" = String, Path, description = "Member ID"),
        ("book_id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Member or book not found"),
        (status = 422, description = "No active borrow for this pair")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((member_id, book_id)): Path<(String, String)>,
) -> AppResult<Json<ReturnResponse>> {
    claims.require_admin()?;

    let member_id = parse_id(&member_id, "member")?;
    let book_id = parse_id(&book_id, "book")?;

    let outcome = state.services.lending.return_book(member_id, book_id).await?;

    Ok(Json(ReturnResponse {
        member: outcome.member.full_name(),
        book: outcome.book.title,
        return_date: outcome.record.return_date.unwrap_or_else(Utc::now),
        available_copies: outcome.book.available_copies,
        message: "Book returned successfully".to_string(),
    }))
}
