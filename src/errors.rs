//! Centralized error handling.
//!
//! Provides a unified error type for the entire crate. Mapping errors
//! (`InvalidMember`, `UnknownCode`) are first-class variants so they can
//! never be confused with, or replaced by, a default value.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Enumerated attribute mapping
    #[error("'{value}' is not a valid {attribute}")]
    InvalidMember { attribute: String, value: String },

    #[error("stored {attribute} code '{code}' matches no declared member")]
    UnknownCode { attribute: String, code: String },

    #[error("no enumerated attribute named '{0}'")]
    UnknownAttribute(String),

    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("row {index}: {source}")]
    BatchRow {
        index: usize,
        #[source]
        source: Box<AppError>,
    },

    // External errors
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidMember { .. } => "INVALID_MEMBER",
            AppError::UnknownCode { .. } => "UNKNOWN_CODE",
            AppError::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            AppError::InvalidDeclaration(_) => "INVALID_DECLARATION",
            AppError::BatchRow { source, .. } => source.code(),
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Innermost error, unwrapping batch row context.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::BatchRow { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Unique violations surface as `Conflict` so callers see the same error
/// whether the duplicate was caught by a lookup or by the storage index.
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(format_validation_errors(&errors))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| format!("{} {}", field, m))
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join(", ")
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn invalid_member(attribute: impl Into<String>, value: impl ToString) -> Self {
        AppError::InvalidMember {
            attribute: attribute.into(),
            value: value.to_string(),
        }
    }

    pub fn unknown_code(attribute: impl Into<String>, code: impl ToString) -> Self {
        AppError::UnknownCode {
            attribute: attribute.into(),
            code: code.to_string(),
        }
    }

    pub fn batch_row(index: usize, source: AppError) -> Self {
        AppError::BatchRow {
            index,
            source: Box::new(source),
        }
    }
}
