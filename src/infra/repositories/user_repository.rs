//! User repository implementation.
//!
//! Write methods only accept [`UserRow`] / [`UserChanges`], the encoded
//! forms produced by the attribute registry. Raw symbolic payloads cannot
//! reach storage, on the single-row path or on the batch paths.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::entities::user::{self, active_model_from_row, apply_changes, Entity as UserEntity};
use crate::config::{ATTR_HOBBIES, ATTR_ROLE, ATTR_STATUS};
use crate::domain::{user_attributes, AttributeRegistry, User, UserChanges, UserRow};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Rows per `INSERT` statement. Each row binds 8 values, which keeps a
/// chunk well under SQLite's and PostgreSQL's bind parameter limits.
const BATCH_CHUNK_ROWS: usize = 100;

/// Column holding an enumerated attribute.
fn attribute_column(attribute: &str) -> Option<user::Column> {
    match attribute {
        ATTR_ROLE => Some(user::Column::Role),
        ATTR_STATUS => Some(user::Column::Status),
        ATTR_HOBBIES => Some(user::Column::Hobbies),
        _ => None,
    }
}

/// What a plain batch insert does with rows whose email already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Skip the conflicting rows, insert the rest.
    Skip,
    /// Fail the whole batch.
    Raise,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;

    /// List users whose stored status code is (or, with `include == false`,
    /// is not) one of `codes`
    async fn list_by_status(&self, codes: Vec<i32>, include: bool) -> AppResult<Vec<User>>;

    /// Insert a single encoded row
    async fn create(&self, row: UserRow) -> AppResult<User>;

    /// Apply encoded changes to an existing user
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Insert encoded rows, returning the inserted count. The batch is
    /// written in one transaction.
    async fn insert_all(&self, rows: Vec<UserRow>, on_duplicate: OnDuplicate) -> AppResult<u64>;

    /// Insert or update encoded rows keyed by email, returning rows affected.
    /// Existing rows get `name` plus the attributes the first row supplied.
    async fn upsert_all(&self, rows: Vec<UserRow>) -> AppResult<u64>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Delete users by email, returning the number removed
    async fn delete_by_email(&self, email: &str) -> AppResult<u64>;

    /// Count all users
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of [`UserRepository`]
pub struct UserStore {
    db: DatabaseConnection,
    attributes: &'static AttributeRegistry,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            attributes: user_attributes(),
        }
    }

    /// Insert `rows` in chunks of [`BATCH_CHUNK_ROWS`] inside one
    /// transaction. Any failing chunk rolls the whole batch back.
    async fn write_chunked(&self, rows: &[UserRow], on_conflict: Option<OnConflict>) -> AppResult<u64> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let mut written = 0;

        for chunk in rows.chunks(BATCH_CHUNK_ROWS) {
            let models = chunk
                .iter()
                .map(|row| active_model_from_row(row, now))
                .collect::<AppResult<Vec<_>>>()?;

            let mut insert = UserEntity::insert_many(models);
            if let Some(on_conflict) = on_conflict.clone() {
                insert = insert.on_conflict(on_conflict);
            }
            written += insert.exec_without_returning(&txn).await?;
        }

        txn.commit().await?;
        Ok(written)
    }

    fn decode_all(&self, models: Vec<user::Model>) -> AppResult<Vec<User>> {
        models
            .into_iter()
            .map(|m| m.into_user(self.attributes))
            .collect()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|m| m.into_user(self.attributes))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(|m| m.into_user(self.attributes))
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await?;

        self.decode_all(models)
    }

    async fn list_by_status(&self, codes: Vec<i32>, include: bool) -> AppResult<Vec<User>> {
        let filter = if include {
            user::Column::Status.is_in(codes)
        } else {
            user::Column::Status.is_not_in(codes)
        };

        let models = UserEntity::find()
            .filter(filter)
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await?;

        self.decode_all(models)
    }

    async fn create(&self, row: UserRow) -> AppResult<User> {
        let model = active_model_from_row(&row, Utc::now())?
            .insert(&self.db)
            .await?;
        model.into_user(self.attributes)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let model = apply_changes(existing, &changes, Utc::now())?
            .update(&self.db)
            .await?;
        model.into_user(self.attributes)
    }

    async fn insert_all(&self, rows: Vec<UserRow>, on_duplicate: OnDuplicate) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let on_conflict = match on_duplicate {
            OnDuplicate::Skip => Some(
                OnConflict::column(user::Column::Email)
                    .do_nothing()
                    .to_owned(),
            ),
            OnDuplicate::Raise => None,
        };

        let inserted = self.write_chunked(&rows, on_conflict).await?;
        tracing::debug!(rows = rows.len(), inserted, "Batch insert into users");
        Ok(inserted)
    }

    async fn upsert_all(&self, rows: Vec<UserRow>) -> AppResult<u64> {
        let Some(first) = rows.first() else {
            return Ok(0);
        };

        let mut columns = vec![user::Column::Name, user::Column::UpdatedAt];
        columns.extend(first.supplied().iter().filter_map(|a| attribute_column(a)));

        let on_conflict = OnConflict::column(user::Column::Email)
            .update_columns(columns)
            .to_owned();

        let affected = self.write_chunked(&rows, Some(on_conflict)).await?;
        tracing::debug!(rows = rows.len(), affected, "Batch upsert into users");
        Ok(affected)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<u64> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Email.eq(email))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }
}
