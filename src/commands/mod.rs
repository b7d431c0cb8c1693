//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod migrate;
pub mod seed;
pub mod users;

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, UserStore};
use crate::services::UserManager;

/// Connect (applying pending migrations) and build the user service.
pub(crate) async fn user_service(config: &Config) -> AppResult<UserManager> {
    let db = Database::connect(config).await?;
    Ok(UserManager::new(Arc::new(UserStore::new(db.get_connection()))))
}
