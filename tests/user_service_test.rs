//! User service integration tests.
//!
//! These run against an in-memory SQLite database with all migrations
//! applied, so every assertion on a stored code reads what the database
//! actually holds.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};

use enum_mapped_users::config::Config;
use enum_mapped_users::domain::{Hobby, NewUser, UpdateUser, UserRole, UserStatus};
use enum_mapped_users::errors::AppError;
use enum_mapped_users::infra::{Database, UserStore};
use enum_mapped_users::services::{UserManager, UserService};

async fn setup() -> (UserManager, DatabaseConnection) {
    let db = Database::connect(&Config::in_memory())
        .await
        .expect("in-memory database");
    let conn = db.get_connection();
    let service = UserManager::new(Arc::new(UserStore::new(conn.clone())));
    (service, conn)
}

async fn stored_status(conn: &DatabaseConnection, email: &str) -> i32 {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            conn.get_database_backend(),
            "SELECT status FROM users WHERE email = ?",
            [Value::from(email)],
        ))
        .await
        .unwrap()
        .expect("row exists");
    row.try_get::<i32>("", "status").unwrap()
}

async fn force_status(conn: &DatabaseConnection, email: &str, code: i32) {
    conn.execute(Statement::from_sql_and_values(
        conn.get_database_backend(),
        "UPDATE users SET status = ? WHERE email = ?",
        [Value::from(code), Value::from(email)],
    ))
    .await
    .unwrap();
}

fn row(email: &str, status: &str) -> NewUser {
    NewUser::new("Test User", email)
        .role("admin")
        .status(status)
        .hobbies(vec!["reading", "travel"])
}

// =============================================================================
// Single-row writes
// =============================================================================

#[tokio::test]
async fn test_create_stores_enum_values() {
    let (service, conn) = setup().await;

    let user = service
        .create_user(row("test@example.com", "inactive"))
        .await
        .unwrap();

    assert_eq!(user.status, UserStatus::Inactive);
    assert_eq!(user.role, UserRole::Admin);
    assert!(user.is_admin());
    assert_eq!(user.hobbies, vec![Hobby::Reading, Hobby::Travel]);
    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
}

#[tokio::test]
async fn test_create_accepts_typed_symbols() {
    let (service, _conn) = setup().await;

    let user = service
        .create_user(
            NewUser::new("Test User", "test@example.com")
                .role(UserRole::Manager)
                .status(UserStatus::Suspended)
                .hobbies([Hobby::Music]),
        )
        .await
        .unwrap();

    assert_eq!(user.status, UserStatus::Suspended);
    assert!(user.is_manager());
    assert!(user.has_hobby(Hobby::Music));
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let (service, conn) = setup().await;

    let user = service
        .create_user(NewUser::new("Test User", "test@example.com"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Employee);
    assert_eq!(user.status, UserStatus::Active);
    assert!(user.hobbies.is_empty());
    assert_eq!(stored_status(&conn, "test@example.com").await, 0);
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let (service, _conn) = setup().await;

    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();
    let err = service
        .create_user(row("test@example.com", "inactive"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_create_blank_name_is_rejected() {
    let (service, _conn) = setup().await;

    let err = service
        .create_user(NewUser::new("  ", "test@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(service.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_encodes_status() {
    let (service, conn) = setup().await;
    let user = service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    let updated = service
        .update_user(user.id, UpdateUser::default().status("suspended"))
        .await
        .unwrap();

    assert_eq!(updated.status, UserStatus::Suspended);
    assert_eq!(updated.role, UserRole::Admin);
    assert_eq!(stored_status(&conn, "test@example.com").await, 3);
}

#[tokio::test]
async fn test_update_unknown_member_leaves_row_untouched() {
    let (service, conn) = setup().await;
    let user = service
        .create_user(row("test@example.com", "inactive"))
        .await
        .unwrap();

    let err = service
        .update_user(user.id, UpdateUser::default().status("archived"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidMember { .. }));
    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
}

#[tokio::test]
async fn test_reading_undeclared_code_fails() {
    let (service, conn) = setup().await;
    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();
    force_status(&conn, "test@example.com", 2).await;

    let err = service
        .get_user_by_email("test@example.com")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::UnknownCode { ref attribute, ref code } if attribute == "status" && code == "2"
    ));
    assert!(service.list_users().await.is_err());
}

// =============================================================================
// Batch insert
// =============================================================================

#[tokio::test]
async fn test_insert_all_encodes_status() {
    let (service, conn) = setup().await;

    let inserted = service
        .insert_all(vec![row("test@example.com", "inactive")])
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    let user = service.get_user_by_email("test@example.com").await.unwrap();
    assert_eq!(user.status, UserStatus::Inactive);
    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
}

#[tokio::test]
async fn test_insert_all_multiple_rows() {
    let (service, conn) = setup().await;

    service
        .insert_all(vec![
            row("test@example.com", "inactive"),
            row("test2@example.com", "suspended"),
            row("test3@example.com", "active"),
        ])
        .await
        .unwrap();

    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
    assert_eq!(stored_status(&conn, "test2@example.com").await, 3);
    assert_eq!(stored_status(&conn, "test3@example.com").await, 0);
}

#[tokio::test]
async fn test_insert_all_keeps_role_and_hobbies() {
    let (service, _conn) = setup().await;

    service
        .insert_all(vec![row("test@example.com", "inactive")])
        .await
        .unwrap();

    let user = service.get_user_by_email("test@example.com").await.unwrap();
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(user.hobbies, vec![Hobby::Reading, Hobby::Travel]);
}

#[tokio::test]
async fn test_insert_all_accepts_numeric_code() {
    let (service, _conn) = setup().await;

    service
        .insert_all(vec![NewUser::new("Test User", "test@example.com").status(1)])
        .await
        .unwrap();

    let user = service.get_user_by_email("test@example.com").await.unwrap();
    assert_eq!(user.status, UserStatus::Inactive);
}

#[tokio::test]
async fn test_insert_all_invalid_member_writes_nothing() {
    let (service, _conn) = setup().await;

    let err = service
        .insert_all(vec![
            row("test@example.com", "inactive"),
            row("test2@example.com", "archived"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BatchRow { index: 1, .. }));
    assert!(matches!(err.root(), AppError::InvalidMember { .. }));
    assert_eq!(service.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_all_reserved_code_is_rejected() {
    let (service, _conn) = setup().await;

    let err = service
        .insert_all(vec![NewUser::new("Test User", "test@example.com").status(2)])
        .await
        .unwrap_err();

    assert!(matches!(err.root(), AppError::InvalidMember { value, .. } if value == "2"));
    assert_eq!(service.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_all_skips_existing_email() {
    let (service, conn) = setup().await;
    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    let inserted = service
        .insert_all(vec![
            row("test@example.com", "suspended"),
            row("test2@example.com", "inactive"),
        ])
        .await
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(stored_status(&conn, "test@example.com").await, 0);
    assert_eq!(stored_status(&conn, "test2@example.com").await, 1);
}

#[tokio::test]
async fn test_insert_all_strict_raises_on_existing_email() {
    let (service, _conn) = setup().await;
    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    let err = service
        .insert_all_strict(vec![
            row("test2@example.com", "inactive"),
            row("test@example.com", "suspended"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_insert_all_large_batch() {
    let (service, conn) = setup().await;
    let rows: Vec<_> = (0..5_000)
        .map(|i| row(&format!("user{i}@example.com"), if i % 2 == 0 { "inactive" } else { "suspended" }))
        .collect();

    let inserted = service.insert_all(rows).await.unwrap();

    assert_eq!(inserted, 5_000);
    assert_eq!(service.count_users().await.unwrap(), 5_000);
    assert_eq!(stored_status(&conn, "user4998@example.com").await, 1);
    assert_eq!(stored_status(&conn, "user4999@example.com").await, 3);
}

#[tokio::test]
async fn test_upsert_all_large_batch() {
    let (service, conn) = setup().await;
    service
        .create_user(row("user4999@example.com", "active"))
        .await
        .unwrap();
    let rows: Vec<_> = (0..5_000)
        .map(|i| NewUser::new("Bulk", format!("user{i}@example.com")).status("inactive"))
        .collect();

    service.upsert_all(rows).await.unwrap();

    assert_eq!(service.count_users().await.unwrap(), 5_000);
    assert_eq!(stored_status(&conn, "user4999@example.com").await, 1);
}

#[tokio::test]
async fn test_insert_all_strict_conflict_in_late_chunk_writes_nothing() {
    let (service, _conn) = setup().await;
    service
        .create_user(row("user4999@example.com", "active"))
        .await
        .unwrap();
    let rows: Vec<_> = (0..5_000)
        .map(|i| row(&format!("user{i}@example.com"), "inactive"))
        .collect();

    let err = service.insert_all_strict(rows).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_insert_all_empty_batch() {
    let (service, _conn) = setup().await;
    assert_eq!(service.insert_all(vec![]).await.unwrap(), 0);
}

// =============================================================================
// Batch upsert
// =============================================================================

#[tokio::test]
async fn test_upsert_all_inserts_new_row() {
    let (service, conn) = setup().await;

    service
        .upsert_all(vec![row("test@example.com", "inactive")])
        .await
        .unwrap();

    let user = service.get_user_by_email("test@example.com").await.unwrap();
    assert_eq!(user.status, UserStatus::Inactive);
    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
}

#[tokio::test]
async fn test_upsert_all_updates_existing_row() {
    let (service, conn) = setup().await;
    let original = service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    service
        .upsert_all(vec![NewUser::new("Renamed", "test@example.com")
            .role("intern")
            .status("inactive")])
        .await
        .unwrap();

    let user = service.get_user_by_email("test@example.com").await.unwrap();
    assert_eq!(user.id, original.id);
    assert_eq!(user.name, "Renamed");
    assert_eq!(user.status, UserStatus::Inactive);
    assert!(user.is_intern());
    assert_eq!(user.hobbies, vec![Hobby::Reading, Hobby::Travel]);
    assert_eq!(stored_status(&conn, "test@example.com").await, 1);
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_all_keeps_omitted_attributes() {
    let (service, conn) = setup().await;
    service
        .create_user(
            NewUser::new("A", "a@example.com")
                .status("suspended")
                .hobbies(vec!["music"]),
        )
        .await
        .unwrap();

    service
        .upsert_all(vec![
            NewUser::new("A2", "a@example.com"),
            NewUser::new("B", "b@example.com"),
        ])
        .await
        .unwrap();

    let a = service.get_user_by_email("a@example.com").await.unwrap();
    assert_eq!(a.name, "A2");
    assert_eq!(a.status, UserStatus::Suspended);
    assert_eq!(a.role, UserRole::Employee);
    assert_eq!(a.hobbies, vec![Hobby::Music]);
    assert_eq!(stored_status(&conn, "a@example.com").await, 3);

    let b = service.get_user_by_email("b@example.com").await.unwrap();
    assert_eq!(b.status, UserStatus::Active);
    assert!(b.hobbies.is_empty());
}

#[tokio::test]
async fn test_upsert_all_mixed_attribute_sets_write_nothing() {
    let (service, conn) = setup().await;
    service
        .create_user(row("test@example.com", "suspended"))
        .await
        .unwrap();

    let err = service
        .upsert_all(vec![
            NewUser::new("Renamed", "test@example.com"),
            NewUser::new("B", "b@example.com").status("inactive"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BatchRow { index: 1, .. }));
    assert_eq!(stored_status(&conn, "test@example.com").await, 3);
    assert_eq!(service.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_all_invalid_member_writes_nothing() {
    let (service, conn) = setup().await;
    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    let err = service
        .upsert_all(vec![
            row("test@example.com", "inactive"),
            row("test2@example.com", "gone"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BatchRow { index: 1, .. }));
    assert_eq!(stored_status(&conn, "test@example.com").await, 0);
    assert_eq!(service.count_users().await.unwrap(), 1);
}

// =============================================================================
// Scopes and deletes
// =============================================================================

#[tokio::test]
async fn test_status_scopes() {
    let (service, _conn) = setup().await;
    service
        .insert_all(vec![
            row("a@example.com", "active"),
            row("b@example.com", "inactive"),
            row("c@example.com", "suspended"),
        ])
        .await
        .unwrap();

    let inactive = service
        .users_with_status(&[UserStatus::Inactive])
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].email, "b@example.com");

    let not_active = service
        .users_without_status(&[UserStatus::Active])
        .await
        .unwrap();
    let emails: Vec<_> = not_active.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["b@example.com", "c@example.com"]);
}

#[tokio::test]
async fn test_delete_by_email() {
    let (service, _conn) = setup().await;
    service
        .create_user(row("test@example.com", "active"))
        .await
        .unwrap();

    assert_eq!(service.delete_by_email("test@example.com").await.unwrap(), 1);
    assert_eq!(service.delete_by_email("test@example.com").await.unwrap(), 0);
    assert!(matches!(
        service.get_user_by_email("test@example.com").await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_user_not_found() {
    let (service, _conn) = setup().await;

    let result = service.delete_user(uuid::Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
