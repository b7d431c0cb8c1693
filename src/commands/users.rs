//! Users command - Scoped listing, batch import and introspection.

use std::path::Path;

use super::user_service;
use crate::cli::args::{UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::{user_attributes, NewUser, User, UserStatus};
use crate::errors::AppResult;
use crate::services::UserService;

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    match args.action {
        UsersAction::Enums => {
            print_enums();
            Ok(())
        }
        UsersAction::List { statuses, exclude } => {
            let users = user_service(&config).await?;
            list(&users, &statuses, exclude).await
        }
        UsersAction::Import {
            file,
            upsert,
            strict,
        } => {
            let users = user_service(&config).await?;
            import(&users, &file, upsert, strict).await
        }
    }
}

async fn list(users: &dyn UserService, statuses: &[String], exclude: bool) -> AppResult<()> {
    let statuses = statuses
        .iter()
        .map(|s| s.parse::<UserStatus>())
        .collect::<AppResult<Vec<_>>>()?;

    let found = match (statuses.is_empty(), exclude) {
        (true, _) => users.list_users().await?,
        (false, false) => users.users_with_status(&statuses).await?,
        (false, true) => users.users_without_status(&statuses).await?,
    };

    for user in &found {
        println!("{}", format_user(user));
    }
    tracing::info!(count = found.len(), "Listed users");
    Ok(())
}

async fn import(users: &dyn UserService, file: &Path, upsert: bool, strict: bool) -> AppResult<()> {
    let payloads = read_rows(file)?;
    let rows = payloads.len();

    let written = if upsert {
        users.upsert_all(payloads).await?
    } else if strict {
        users.insert_all_strict(payloads).await?
    } else {
        users.insert_all(payloads).await?
    };

    println!("{} of {} rows written", written, rows);
    Ok(())
}

/// Parse a JSON array of user rows.
pub fn read_rows(file: &Path) -> AppResult<Vec<NewUser>> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_enums() {
    for attribute in user_attributes().attributes() {
        let members = attribute
            .members()
            .iter()
            .map(|m| {
                if attribute.is_multiple() {
                    m.symbol.to_string()
                } else {
                    format!("{}={}", m.symbol, m.code)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let default = attribute
            .default_member()
            .map(|m| format!(" (default {})", m.symbol))
            .unwrap_or_default();
        println!("{}: {}{}", attribute.name(), members, default);
    }
}

fn format_user(user: &User) -> String {
    let hobbies = user
        .hobbies
        .iter()
        .map(|h| h.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}\t{}\t{}\t{}\t{}\t[{}]",
        user.id, user.email, user.name, user.role, user.status, hobbies
    )
}
