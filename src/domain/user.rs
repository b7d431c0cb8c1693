//! User domain entity and related types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::attributes::{user_attributes, Hobby, UserRole, UserStatus};
use super::enumerated::{AttributeRegistry, AttributeValue, Persisted};
use crate::config::{ATTR_HOBBIES, ATTR_ROLE, ATTR_STATUS, BLANK_MESSAGE};
use crate::errors::{AppError, AppResult};

/// User domain entity, always holding decoded (symbolic) attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub hobbies: Vec<Hobby>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check a role predicate by member name (`"admin"`, `"intern"`, ...).
    pub fn role_is(&self, registry: &AttributeRegistry, member: &str) -> AppResult<bool> {
        let code = registry.find_value(ATTR_ROLE, self.role.as_str())?.code;
        registry.attribute(ATTR_ROLE)?.predicate(member, code)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(UserRole::Manager)
    }

    pub fn is_employee(&self) -> bool {
        self.has_role(UserRole::Employee)
    }

    pub fn is_intern(&self) -> bool {
        self.has_role(UserRole::Intern)
    }

    // `role` declares predicates in the user table, so only a mismatch is false.
    fn has_role(&self, role: UserRole) -> bool {
        matches!(self.role_is(user_attributes(), role.as_str()), Ok(true))
    }

    /// Hobbies as a set; storage order is not meaningful.
    pub fn hobby_set(&self) -> BTreeSet<Hobby> {
        self.hobbies.iter().copied().collect()
    }

    pub fn has_hobby(&self, hobby: Hobby) -> bool {
        self.hobbies.contains(&hobby)
    }
}

/// Row payload for every create path: single create, batch insert,
/// batch upsert and seeding.
///
/// Enumerated attributes are loose [`AttributeValue`]s (symbol, code or
/// list) and only become storable through [`NewUser::encode`]. Omitted
/// attributes take their declared default on insert; the encoded row
/// remembers which ones were supplied so an upsert leaves the others alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<AttributeValue>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn role(mut self, role: impl Into<AttributeValue>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn status(mut self, status: impl Into<AttributeValue>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn hobbies(mut self, hobbies: impl Into<AttributeValue>) -> Self {
        self.hobbies = Some(hobbies.into());
        self
    }

    /// Validate and encode into a storable row.
    pub fn encode(&self, registry: &AttributeRegistry) -> AppResult<UserRow> {
        let trimmed = NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        };
        trimmed.validate()?;

        let supplied = [
            (ATTR_ROLE, trimmed.role.is_some()),
            (ATTR_STATUS, trimmed.status.is_some()),
            (ATTR_HOBBIES, trimmed.hobbies.is_some()),
        ]
        .into_iter()
        .filter_map(|(attribute, present)| present.then_some(attribute))
        .collect();

        Ok(UserRow {
            role: encode_code(registry, ATTR_ROLE, trimmed.role.as_ref())?,
            status: encode_code(registry, ATTR_STATUS, trimmed.status.as_ref())?,
            hobbies: encode_list(registry, ATTR_HOBBIES, trimmed.hobbies.as_ref())?,
            name: trimmed.name,
            email: trimmed.email,
            supplied,
        })
    }
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<AttributeValue>,
    #[serde(default)]
    pub status: Option<AttributeValue>,
    #[serde(default)]
    pub hobbies: Option<AttributeValue>,
}

impl UpdateUser {
    pub fn status(mut self, status: impl Into<AttributeValue>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn role(mut self, role: impl Into<AttributeValue>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn hobbies(mut self, hobbies: impl Into<AttributeValue>) -> Self {
        self.hobbies = Some(hobbies.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validate and encode the supplied fields.
    pub fn encode(&self, registry: &AttributeRegistry) -> AppResult<UserChanges> {
        let name = self.name.as_deref().map(|n| present("name", n)).transpose()?;
        let email = self.email.as_deref().map(|e| present("email", e)).transpose()?;

        let role = self
            .role
            .as_ref()
            .map(|v| encode_code(registry, ATTR_ROLE, Some(v)))
            .transpose()?;
        let status = self
            .status
            .as_ref()
            .map(|v| encode_code(registry, ATTR_STATUS, Some(v)))
            .transpose()?;
        let hobbies = self
            .hobbies
            .as_ref()
            .map(|v| encode_list(registry, ATTR_HOBBIES, Some(v)))
            .transpose()?;

        Ok(UserChanges {
            name,
            email,
            role,
            status,
            hobbies,
        })
    }
}

/// Fully encoded row, ready for storage.
///
/// Only [`NewUser::encode`] builds one, so every row reaching the
/// repository has been through the attribute registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    name: String,
    email: String,
    role: i32,
    status: i32,
    hobbies: Vec<String>,
    supplied: Vec<&'static str>,
}

impl UserRow {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> i32 {
        self.role
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn hobbies(&self) -> &[String] {
        &self.hobbies
    }

    /// Enumerated attributes the payload set explicitly, in declaration order.
    pub fn supplied(&self) -> &[&'static str] {
        &self.supplied
    }
}

/// Encoded partial update produced by [`UpdateUser::encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    name: Option<String>,
    email: Option<String>,
    role: Option<i32>,
    status: Option<i32>,
    hobbies: Option<Vec<String>>,
}

impl UserChanges {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Option<i32> {
        self.role
    }

    pub fn status(&self) -> Option<i32> {
        self.status
    }

    pub fn hobbies(&self) -> Option<&[String]> {
        self.hobbies.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        *self == UserChanges::default()
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(BLANK_MESSAGE.into()));
    }
    Ok(())
}

fn present(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{} {}", field, BLANK_MESSAGE)));
    }
    Ok(value.to_string())
}

fn encode_code(
    registry: &AttributeRegistry,
    attribute: &str,
    value: Option<&AttributeValue>,
) -> AppResult<i32> {
    match registry.encode_or_default(attribute, value)? {
        Persisted::Code(code) => Ok(code),
        Persisted::List(_) => Err(AppError::internal(format!(
            "{} is declared multiple",
            attribute
        ))),
    }
}

fn encode_list(
    registry: &AttributeRegistry,
    attribute: &str,
    value: Option<&AttributeValue>,
) -> AppResult<Vec<String>> {
    match registry.encode_or_default(attribute, value)? {
        Persisted::List(list) => Ok(list),
        Persisted::Code(_) => Err(AppError::internal(format!(
            "{} is not declared multiple",
            attribute
        ))),
    }
}
