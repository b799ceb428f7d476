//! In-memory store fakes for service tests
//!
//! One `InMemoryStore` implements every storage port over mutex-guarded
//! maps. The insert paths reject the same key collisions the database
//! unique indexes would, so duplicate-constraint behavior is observable
//! without PostgreSQL.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    application::{Application, ApplicationQuery},
    book::{self, Book, BookQuery},
    borrow::{BorrowDetails, BorrowRecord},
    enums::MembershipStatus,
    member::{Member, MemberQuery},
    project::{Project, ProjectQuery, TeamMember},
    review::{RatingSummary, Review, ReviewQuery},
    user::User,
};

use super::{
    ApplicationStore, BookStore, BorrowStore, MemberStore, ProjectStore, ReviewStore, UserStore,
};

#[derive(Default)]
pub struct InMemoryStore {
    books: Mutex<HashMap<Uuid, Book>>,
    members: Mutex<HashMap<Uuid, Member>>,
    borrows: Mutex<HashMap<Uuid, BorrowRecord>>,
    users: Mutex<HashMap<Uuid, User>>,
    projects: Mutex<HashMap<Uuid, Project>>,
    team_members: Mutex<HashMap<Uuid, TeamMember>>,
    applications: Mutex<HashMap<Uuid, Application>>,
    reviews: Mutex<HashMap<Uuid, Review>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_availability(&self, mut book: Book) -> Book {
        let active = self
            .borrows
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.book_id == book.id && !b.is_returned)
            .count() as i64;
        book.available_copies = book::available_copies(book.total_copies, active);
        book
    }

    fn paginate<T: Clone>(items: Vec<T>, page: Option<i64>, per_page: Option<i64>) -> (Vec<T>, i64) {
        let total = items.len() as i64;
        let page = page.unwrap_or(1).max(1) as usize;
        let per_page = per_page.unwrap_or(10).max(1) as usize;
        let rows = items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        (rows, total)
    }
}

#[async_trait]
impl BookStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = self.books.lock().unwrap().get(&id).cloned();
        Ok(book.map(|b| self.with_availability(b)))
    }

    async fn isbn_exists(&self, isbn: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != exclude))
    }

    async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let books: Vec<Book> = self
            .books
            .lock()
            .unwrap()
            .values()
            .filter(|b| query.genre.as_ref().map_or(true, |g| &b.genre == g))
            .filter(|b| {
                query
                    .author
                    .as_ref()
                    .map_or(true, |a| b.author.to_lowercase().contains(&a.to_lowercase()))
            })
            .filter(|b| {
                query
                    .title
                    .as_ref()
                    .map_or(true, |t| b.title.to_lowercase().contains(&t.to_lowercase()))
            })
            .cloned()
            .collect();
        let books = books.into_iter().map(|b| self.with_availability(b)).collect();
        Ok(Self::paginate(books, query.page, query.per_page))
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        if self.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(self.with_availability(book.clone()))
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(self.with_availability(book.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.books.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        Ok(self.members.lock().unwrap().get(&id).cloned())
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .values()
            .any(|m| m.email.eq_ignore_ascii_case(email) && Some(m.id) != exclude))
    }

    async fn list(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        let members: Vec<Member> = self
            .members
            .lock()
            .unwrap()
            .values()
            .filter(|m| query.membership_type.map_or(true, |t| m.membership_type == t))
            .filter(|m| query.is_active.map_or(true, |a| m.is_active == a))
            .cloned()
            .collect();
        Ok(Self::paginate(members, query.page, query.per_page))
    }

    async fn insert(&self, member: &Member) -> AppResult<Member> {
        if self.email_exists(&member.email, None).await? {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        self.members.lock().unwrap().insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn update(&self, member: &Member) -> AppResult<Member> {
        self.members.lock().unwrap().insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.members.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BorrowStore for InMemoryStore {
    async fn active_entry(
        &self,
        member_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<Option<BorrowRecord>> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .values()
            .find(|b| b.member_id == member_id && b.book_id == book_id && !b.is_returned)
            .cloned())
    }

    async fn active_count_for_book(&self, book_id: Uuid) -> AppResult<i64> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.book_id == book_id && !b.is_returned)
            .count() as i64)
    }

    async fn active_count_for_member(&self, member_id: Uuid) -> AppResult<i64> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.member_id == member_id && !b.is_returned)
            .count() as i64)
    }

    async fn history_exists_for_book(&self, book_id: Uuid) -> AppResult<bool> {
        Ok(self
            .borrows
            .lock()
            .unwrap()
            .values()
            .any(|b| b.book_id == book_id))
    }

    async fn insert(&self, record: &BorrowRecord) -> AppResult<BorrowRecord> {
        let mut borrows = self.borrows.lock().unwrap();
        // Same collision the partial unique index rejects
        if borrows
            .values()
            .any(|b| b.member_id == record.member_id && b.book_id == record.book_id && !b.is_returned)
        {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        borrows.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn mark_returned(
        &self,
        entry_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut borrows = self.borrows.lock().unwrap();
        let entry = borrows
            .get_mut(&entry_id)
            .filter(|e| !e.is_returned)
            .ok_or_else(|| AppError::BusinessRule("Entry is already returned".to_string()))?;
        entry.is_returned = true;
        entry.return_date = Some(returned_at);
        Ok(entry.clone())
    }

    async fn list_for_member(&self, member_id: Uuid) -> AppResult<Vec<BorrowDetails>> {
        let now = Utc::now();
        let books = self.books.lock().unwrap();
        let mut entries: Vec<BorrowRecord> = self
            .borrows
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.member_id == member_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.borrow_date.cmp(&a.borrow_date));

        Ok(entries
            .into_iter()
            .map(|e| {
                let book = books.get(&e.book_id);
                BorrowDetails {
                    id: e.id,
                    book_id: e.book_id,
                    book_title: book.map(|b| b.title.clone()).unwrap_or_default(),
                    book_author: book.map(|b| b.author.clone()).unwrap_or_default(),
                    book_isbn: book.map(|b| b.isbn.clone()).unwrap_or_default(),
                    borrow_date: e.borrow_date,
                    due_date: e.due_date,
                    return_date: e.return_date,
                    is_overdue: e.is_overdue(now),
                    is_returned: e.is_returned,
                }
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Project>> {
        Ok(self.projects.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, query: &ProjectQuery) -> AppResult<(Vec<Project>, i64)> {
        let projects: Vec<Project> = self
            .projects
            .lock()
            .unwrap()
            .values()
            .filter(|p| query.status.map_or(true, |s| p.status == s))
            .filter(|p| query.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| query.owner_id.map_or(true, |o| p.owner_id == o))
            .cloned()
            .collect();
        Ok(Self::paginate(projects, query.page, query.per_page))
    }

    async fn insert(&self, project: &Project) -> AppResult<Project> {
        self.projects.lock().unwrap().insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn update(&self, project: &Project) -> AppResult<Project> {
        self.projects.lock().unwrap().insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.projects.lock().unwrap().remove(&id);
        self.team_members
            .lock()
            .unwrap()
            .retain(|_, m| m.project_id != id);
        Ok(())
    }

    async fn team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let mut team: Vec<TeamMember> = self
            .team_members
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        team.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(team)
    }

    async fn active_team(&self, project_id: Uuid) -> AppResult<Vec<TeamMember>> {
        Ok(self
            .team(project_id)
            .await?
            .into_iter()
            .filter(|m| m.is_active())
            .collect())
    }

    async fn insert_team_member(&self, member: &TeamMember) -> AppResult<TeamMember> {
        let mut team = self.team_members.lock().unwrap();
        if team.values().any(|m| {
            m.project_id == member.project_id
                && m.user_id == member.user_id
                && m.status == MembershipStatus::Active
        }) {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        team.insert(member.id, member.clone());
        Ok(member.clone())
    }

    async fn set_membership_status(
        &self,
        entry_id: Uuid,
        status: MembershipStatus,
    ) -> AppResult<TeamMember> {
        let mut team = self.team_members.lock().unwrap();
        let entry = team
            .get_mut(&entry_id)
            .ok_or_else(|| AppError::NotFound("Team membership entry not found".to_string()))?;
        entry.status = status;
        Ok(entry.clone())
    }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        Ok(self.applications.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_pair(
        &self,
        project_id: Uuid,
        applicant_id: Uuid,
    ) -> AppResult<Option<Application>> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .find(|a| a.project_id == project_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn list(&self, query: &ApplicationQuery) -> AppResult<(Vec<Application>, i64)> {
        let apps: Vec<Application> = self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|a| query.status.map_or(true, |s| a.status == s))
            .filter(|a| query.project_id.map_or(true, |p| a.project_id == p))
            .filter(|a| query.applicant_id.map_or(true, |u| a.applicant_id == u))
            .cloned()
            .collect();
        Ok(Self::paginate(apps, query.page, query.per_page))
    }

    async fn insert(&self, application: &Application) -> AppResult<Application> {
        let mut apps = self.applications.lock().unwrap();
        if apps.values().any(|a| {
            a.project_id == application.project_id && a.applicant_id == application.applicant_id
        }) {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        apps.insert(application.id, application.clone());
        Ok(application.clone())
    }

    async fn update(&self, application: &Application) -> AppResult<Application> {
        self.applications
            .lock()
            .unwrap()
            .insert(application.id, application.clone());
        Ok(application.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.applications.lock().unwrap().remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(self.reviews.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_pair(
        &self,
        project_id: Uuid,
        reviewer_id: Uuid,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .values()
            .find(|r| r.project_id == project_id && r.reviewer_id == reviewer_id)
            .cloned())
    }

    async fn list(&self, query: &ReviewQuery) -> AppResult<(Vec<Review>, i64)> {
        let reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .values()
            .filter(|r| query.project_id.map_or(true, |p| r.project_id == p))
            .filter(|r| query.reviewee_id.map_or(true, |u| r.reviewee_id == u))
            .cloned()
            .collect();
        Ok(Self::paginate(reviews, query.page, query.per_page))
    }

    async fn insert(&self, review: &Review) -> AppResult<Review> {
        let mut reviews = self.reviews.lock().unwrap();
        if reviews
            .values()
            .any(|r| r.project_id == review.project_id && r.reviewer_id == review.reviewer_id)
        {
            return Err(AppError::Conflict("A record with this key already exists".to_string()));
        }
        reviews.insert(review.id, review.clone());
        Ok(review.clone())
    }

    async fn update(&self, review: &Review) -> AppResult<Review> {
        self.reviews.lock().unwrap().insert(review.id, review.clone());
        Ok(review.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.reviews.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn rating_summary(&self, reviewee_id: Uuid) -> AppResult<RatingSummary> {
        let reviews = self.reviews.lock().unwrap();
        let ratings: Vec<i16> = reviews
            .values()
            .filter(|r| r.reviewee_id == reviewee_id)
            .map(|r| r.rating)
            .collect();
        let total = ratings.len() as i64;
        let average = if total == 0 {
            0.0
        } else {
            ratings.iter().map(|r| *r as f64).sum::<f64>() / total as f64
        };
        Ok(RatingSummary {
            reviewee_id,
            average_rating: average,
            total_reviews: total,
        })
    }
}
