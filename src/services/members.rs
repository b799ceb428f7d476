//! Library member management service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow::BorrowDetails,
    models::enums::MembershipType,
    models::member::{CreateMember, Member, MemberDetails, MemberQuery, UpdateMember},
    repository::{BorrowStore, MemberStore},
};

#[derive(Clone)]
pub struct MembersService {
    members: Arc<dyn MemberStore>,
    borrows: Arc<dyn BorrowStore>,
}

impl MembersService {
    pub fn new(members: Arc<dyn MemberStore>, borrows: Arc<dyn BorrowStore>) -> Self {
        Self { members, borrows }
    }

    /// List members with filters and pagination
    pub async fn list_members(&self, query: &MemberQuery) -> AppResult<(Vec<Member>, i64)> {
        self.members.list(query).await
    }

    /// Get member by ID
    pub async fn get_member(&self, id: Uuid) -> AppResult<Member> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    /// Get member with their borrow ledger and derived counts
    pub async fn get_member_details(&self, id: Uuid) -> AppResult<MemberDetails> {
        let member = self.get_member(id).await?;
        let borrows = self.borrows.list_for_member(id).await?;
        Ok(build_details(member, borrows))
    }

    /// Create a new member
    pub async fn create_member(&self, data: CreateMember) -> AppResult<Member> {
        if self.members.email_exists(&data.email, None).await? {
            return Err(AppError::Conflict(
                "Member with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            street: data.street,
            city: data.city,
            state: data.state,
            zip_code: data.zip_code,
            membership_date: now,
            membership_type: data.membership_type.unwrap_or(MembershipType::Basic),
            is_active: true,
            fines: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.members.insert(&member).await
    }

    /// Update an existing member
    pub async fn update_member(&self, id: Uuid, data: UpdateMember) -> AppResult<Member> {
        let mut member = self.get_member(id).await?;

        if let Some(ref email) = data.email {
            if self.members.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Member with this email already exists".to_string(),
                ));
            }
            member.email = email.clone();
        }
        if let Some(first_name) = data.first_name {
            member.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            member.last_name = last_name;
        }
        if let Some(phone) = data.phone {
            member.phone = phone;
        }
        if let Some(street) = data.street {
            member.street = Some(street);
        }
        if let Some(city) = data.city {
            member.city = Some(city);
        }
        if let Some(state) = data.state {
            member.state = Some(state);
        }
        if let Some(zip) = data.zip_code {
            member.zip_code = Some(zip);
        }
        if let Some(membership_type) = data.membership_type {
            member.membership_type = membership_type;
        }
        if let Some(active) = data.is_active {
            member.is_active = active;
        }
        if let Some(fines) = data.fines {
            member.fines = fines;
        }
        member.updated_at = Utc::now();

        self.members.update(&member).await
    }

    /// Delete a member. Refused while unreturned books are on the ledger.
    pub async fn delete_member(&self, id: Uuid) -> AppResult<Member> {
        let member = self.get_member(id).await?;

        let unreturned = self.borrows.active_count_for_member(id).await?;
        if unreturned > 0 {
            return Err(AppError::BusinessRule(format!(
                "Cannot delete member with {} unreturned book(s)",
                unreturned
            )));
        }

        self.members.delete(id).await?;
        Ok(member)
    }
}

fn build_details(member: Member, borrows: Vec<BorrowDetails>) -> MemberDetails {
    let current_borrowed_count = borrows.iter().filter(|b| !b.is_returned).count();
    let overdue_count = borrows.iter().filter(|b| b.is_overdue).count();
    MemberDetails {
        member,
        borrows,
        current_borrowed_count,
        overdue_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryStore;

    fn service() -> (MembersService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (MembersService::new(store.clone(), store.clone()), store)
    }

    fn new_member(email: &str) -> CreateMember {
        CreateMember {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "15551234567".to_string(),
            street: None,
            city: None,
            state: None,
            zip_code: None,
            membership_type: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (members, _) = service();
        members.create_member(new_member("ada@example.org")).await.unwrap();
        let err = members
            .create_member(new_member("ada@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_refused_with_unreturned_books() {
        let (members, store) = service();
        let member = members.create_member(new_member("ada@example.org")).await.unwrap();

        let record =
            crate::models::BorrowRecord::new(member.id, Uuid::new_v4(), Utc::now(), 14);
        crate::repository::BorrowStore::insert(store.as_ref(), &record)
            .await
            .unwrap();

        let err = members.delete_member(member.id).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));

        // After the book comes back the delete goes through
        store.mark_returned(record.id, Utc::now()).await.unwrap();
        members.delete_member(member.id).await.unwrap();
        assert!(members.get_member(member.id).await.is_err());
    }
}
