//! Seed command - Populate sample users.

use super::user_service;
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::seed_users;

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let users = user_service(&config).await?;
    let report = seed_users(&users).await?;

    println!(
        "Created {} users ({} new, {} already present).",
        report.total_users, report.created, report.existing
    );
    Ok(())
}
