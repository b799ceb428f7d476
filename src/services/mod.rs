//! Business logic services
//!
//! Each service is the invariant enforcer for its resources: it resolves
//! entities through the storage ports, validates the requested transition
//! against current ledger state, and only then writes.

pub mod applications;
pub mod auth;
pub mod catalog;
pub mod lending;
pub mod members;
pub mod projects;
pub mod reviews;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    repository::{
        ApplicationStore, BookStore, BorrowStore, MemberStore, ProjectStore, Repository,
        ReviewStore, UserStore,
    },
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub lending: lending::LendingService,
    pub projects: projects::ProjectsService,
    pub applications: applications::ApplicationsService,
    pub reviews: reviews::ReviewsService,
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl Services {
    /// Database pool handle, used by the readiness probe
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Services {
    /// Create all services wired to the PostgreSQL adapters
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let books: Arc<dyn BookStore> = Arc::new(repository.books.clone());
        let members: Arc<dyn MemberStore> = Arc::new(repository.members.clone());
        let borrows: Arc<dyn BorrowStore> = Arc::new(repository.borrows.clone());
        let users: Arc<dyn UserStore> = Arc::new(repository.users.clone());
        let projects: Arc<dyn ProjectStore> = Arc::new(repository.projects.clone());
        let applications: Arc<dyn ApplicationStore> = Arc::new(repository.applications.clone());
        let reviews: Arc<dyn ReviewStore> = Arc::new(repository.reviews.clone());

        Self {
            auth: auth::AuthService::new(users.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(books.clone(), borrows.clone()),
            members: members::MembersService::new(members.clone(), borrows.clone()),
            lending: lending::LendingService::new(
                members,
                books,
                borrows,
                config.lending.clone(),
            ),
            projects: projects::ProjectsService::new(projects.clone(), users.clone()),
            applications: applications::ApplicationsService::new(
                applications,
                projects.clone(),
            ),
            reviews: reviews::ReviewsService::new(reviews, projects),
            pool: repository.pool.clone(),
        }
    }
}
