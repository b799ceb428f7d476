//! Repository layer: storage-port traits and their PostgreSQL adapters
//!
//! Services never see the pool; they receive the store traits by explicit
//! construction, so tests can substitute the in-memory fakes in
//! [`memory`](self::memory) or mockall mocks.

pub mod applications;
pub mod books;
pub mod borrows;
pub mod members;
pub mod projects;
pub mod reviews;
pub mod users;

#[cfg(test)]
pub mod memory;

use sqlx::{Pool, Postgres};

pub use applications::ApplicationStore;
pub use books::BookStore;
pub use borrows::BorrowStore;
pub use members::MemberStore;
pub use projects::ProjectStore;
pub use reviews::ReviewStore;
pub use users::UserStore;

/// Container for the PostgreSQL adapters
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::PgBooksRepository,
    pub members: members::PgMembersRepository,
    pub borrows: borrows::PgBorrowsRepository,
    pub users: users::PgUsersRepository,
    pub projects: projects::PgProjectsRepository,
    pub applications: applications::PgApplicationsRepository,
    pub reviews: reviews::PgReviewsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::PgBooksRepository::new(pool.clone()),
            members: members::PgMembersRepository::new(pool.clone()),
            borrows: borrows::PgBorrowsRepository::new(pool.clone()),
            users: users::PgUsersRepository::new(pool.clone()),
            projects: projects::PgProjectsRepository::new(pool.clone()),
            applications: applications::PgApplicationsRepository::new(pool.clone()),
            reviews: reviews::PgReviewsRepository::new(pool.clone()),
            pool,
        }
    }
}
