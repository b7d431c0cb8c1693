//! User database entity for SeaORM.
//!
//! Columns hold persisted representations only: `role` and `status` are
//! integer codes, `hobbies` a JSON array of symbols.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::config::{ATTR_HOBBIES, ATTR_ROLE, ATTR_STATUS};
use crate::domain::{AttributeRegistry, Hobby, User, UserChanges, UserRole, UserRow, UserStatus};
use crate::errors::AppResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: i32,
    pub status: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub hobbies: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode a stored row into the domain entity.
    ///
    /// A code that matches no declared member is an error, never a default.
    pub fn into_user(self, registry: &AttributeRegistry) -> AppResult<User> {
        let role = registry.attribute(ATTR_ROLE)?.decode_code(self.role)?.parse::<UserRole>()?;
        let status = registry.attribute(ATTR_STATUS)?.decode_code(self.status)?.parse::<UserStatus>()?;

        let stored: Vec<String> = match self.hobbies.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
            _ => Vec::new(),
        };
        let hobbies = registry
            .attribute(ATTR_HOBBIES)?
            .decode_list(&stored)?
            .into_iter()
            .map(str::parse::<Hobby>)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            status,
            hobbies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Build an insertable model from an encoded row.
pub fn active_model_from_row(row: &UserRow, now: DateTime<Utc>) -> AppResult<ActiveModel> {
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(row.name().to_string()),
        email: Set(row.email().to_string()),
        role: Set(row.role()),
        status: Set(row.status()),
        hobbies: Set(Some(serde_json::to_string(row.hobbies())?)),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

/// Apply encoded changes onto an existing model.
pub fn apply_changes(
    model: Model,
    changes: &UserChanges,
    now: DateTime<Utc>,
) -> AppResult<ActiveModel> {
    let mut active: ActiveModel = model.into();

    if let Some(name) = changes.name() {
        active.name = Set(name.to_string());
    }
    if let Some(email) = changes.email() {
        active.email = Set(email.to_string());
    }
    if let Some(role) = changes.role() {
        active.role = Set(role);
    }
    if let Some(status) = changes.status() {
        active.status = Set(status);
    }
    if let Some(hobbies) = changes.hobbies() {
        active.hobbies = Set(Some(serde_json::to_string(hobbies)?));
    }
    active.updated_at = Set(now);

    Ok(active)
}
