//! User service - Handles user-related business logic.
//!
//! Every write use case, single-row or batch, validates and encodes its
//! payload through the same attribute registry before the repository sees
//! it. Batches are all-or-nothing: the first row that fails validation or
//! encoding aborts the batch before anything is written. An upsert only
//! overwrites the enumerated attributes its rows supply, so every row of
//! one upsert must supply the same ones.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ATTR_STATUS;
use crate::domain::{user_attributes, AttributeRegistry, NewUser, UpdateUser, User, UserRow, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{OnDuplicate, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Users whose status is one of `statuses`
    async fn users_with_status(&self, statuses: &[UserStatus]) -> AppResult<Vec<User>>;

    /// Users whose status is none of `statuses`
    async fn users_without_status(&self, statuses: &[UserStatus]) -> AppResult<Vec<User>>;

    /// Create a single user (duplicate email is a conflict)
    async fn create_user(&self, payload: NewUser) -> AppResult<User>;

    /// Update user details
    async fn update_user(&self, id: Uuid, payload: UpdateUser) -> AppResult<User>;

    /// Batch insert, skipping rows whose email already exists
    async fn insert_all(&self, payloads: Vec<NewUser>) -> AppResult<u64>;

    /// Batch insert, failing the whole batch on a duplicate email
    async fn insert_all_strict(&self, payloads: Vec<NewUser>) -> AppResult<u64>;

    /// Batch insert-or-update keyed by email
    async fn upsert_all(&self, payloads: Vec<NewUser>) -> AppResult<u64>;

    /// Delete user by ID
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Delete users by email
    async fn delete_by_email(&self, email: &str) -> AppResult<u64>;

    /// Count all users
    async fn count_users(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    attributes: &'static AttributeRegistry,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            attributes: user_attributes(),
        }
    }

    /// Validate and encode every row, tagging failures with the row index.
    fn encode_batch(&self, payloads: &[NewUser]) -> AppResult<Vec<UserRow>> {
        payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| {
                payload
                    .encode(self.attributes)
                    .map_err(|e| AppError::batch_row(index, e))
            })
            .collect()
    }

    /// Upsert rows need distinct emails and one shared set of supplied
    /// attributes, which becomes the set of columns updated on conflict.
    fn check_upsert_rows(rows: &[UserRow]) -> AppResult<()> {
        let mut seen = HashSet::new();
        let expected = rows.first().map(UserRow::supplied).unwrap_or_default();

        for (index, row) in rows.iter().enumerate() {
            if !seen.insert(row.email()) {
                return Err(AppError::batch_row(
                    index,
                    AppError::validation(format!("email {} appears twice in batch", row.email())),
                ));
            }
            if row.supplied() != expected {
                return Err(AppError::batch_row(
                    index,
                    AppError::validation(format!(
                        "row supplies [{}] but the batch supplies [{}]",
                        row.supplied().join(", "),
                        expected.join(", ")
                    )),
                ));
            }
        }
        Ok(())
    }

    fn status_codes(&self, statuses: &[UserStatus]) -> AppResult<Vec<i32>> {
        let symbols: Vec<&str> = statuses.iter().map(UserStatus::as_str).collect();
        self.attributes.attribute(ATTR_STATUS)?.scope_codes(symbols.as_slice())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn users_with_status(&self, statuses: &[UserStatus]) -> AppResult<Vec<User>> {
        let codes = self.status_codes(statuses)?;
        self.repo.list_by_status(codes, true).await
    }

    async fn users_without_status(&self, statuses: &[UserStatus]) -> AppResult<Vec<User>> {
        let codes = self.status_codes(statuses)?;
        self.repo.list_by_status(codes, false).await
    }

    async fn create_user(&self, payload: NewUser) -> AppResult<User> {
        let row = payload.encode(self.attributes)?;

        if self.repo.find_by_email(row.email()).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let user = self.repo.create(row).await?;
        tracing::debug!(id = %user.id, status = %user.status, "Created user");
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, payload: UpdateUser) -> AppResult<User> {
        let changes = payload.encode(self.attributes)?;

        if let Some(email) = changes.email() {
            if let Some(other) = self.repo.find_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::conflict("Email"));
                }
            }
        }

        self.repo.update(id, changes).await
    }

    async fn insert_all(&self, payloads: Vec<NewUser>) -> AppResult<u64> {
        if payloads.is_empty() {
            return Ok(0);
        }
        let rows = self.encode_batch(&payloads)?;
        self.repo.insert_all(rows, OnDuplicate::Skip).await
    }

    async fn insert_all_strict(&self, payloads: Vec<NewUser>) -> AppResult<u64> {
        if payloads.is_empty() {
            return Ok(0);
        }
        let rows = self.encode_batch(&payloads)?;
        self.repo.insert_all(rows, OnDuplicate::Raise).await
    }

    async fn upsert_all(&self, payloads: Vec<NewUser>) -> AppResult<u64> {
        if payloads.is_empty() {
            return Ok(0);
        }
        let rows = self.encode_batch(&payloads)?;
        Self::check_upsert_rows(&rows)?;
        self.repo.upsert_all(rows).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<u64> {
        self.repo.delete_by_email(email).await
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.repo.count().await
    }
}
