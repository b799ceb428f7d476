//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{applications, auth, books, health, members, projects, reviews};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atrium API",
        version = "0.3.0",
        description = "Community Resource & Collaboration Server REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Members & borrows
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        members::list_member_borrows,
        members::borrow_book,
        members::return_book,
        // Projects & team
        projects::list_projects,
        projects::get_project,
        projects::create_project,
        projects::update_project,
        projects::delete_project,
        projects::add_team_member,
        projects::remove_team_member,
        // Applications
        applications::list_applications,
        applications::my_applications,
        applications::get_application,
        applications::create_application,
        applications::update_application_status,
        applications::delete_application,
        // Reviews
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        reviews::user_rating,
    ),
    components(
        schemas(
            // Auth
            auth::TokenResponse,
            crate::models::user::CreateUser,
            crate::models::user::LoginRequest,
            crate::models::user::UserPublic,
            crate::models::user::User,
            crate::models::enums::UserRole,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Members & borrows
            crate::models::member::Member,
            crate::models::member::MemberDetails,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            crate::models::enums::MembershipType,
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetails,
            members::BorrowResponse,
            members::ReturnResponse,
            // Projects & team
            crate::models::project::Project,
            crate::models::project::ProjectDetails,
            crate::models::project::CreateProject,
            crate::models::project::UpdateProject,
            crate::models::project::TeamMember,
            crate::models::enums::ProjectStatus,
            crate::models::enums::MembershipStatus,
            projects::AddTeamMemberRequest,
            // Applications
            crate::models::application::Application,
            crate::models::application::CreateApplication,
            crate::models::application::UpdateApplicationStatus,
            crate::models::enums::ApplicationStatus,
            // Reviews
            crate::models::review::Review,
            crate::models::review::CreateReview,
            crate::models::review::UpdateReview,
            crate::models::review::RatingSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Library catalog management"),
        (name = "members", description = "Library member management"),
        (name = "borrows", description = "Borrow and return operations"),
        (name = "projects", description = "Project and team management"),
        (name = "applications", description = "Project applications"),
        (name = "reviews", description = "Peer reviews")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
