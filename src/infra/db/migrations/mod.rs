//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250805_000001_create_users_table;
mod m20250805_000002_change_status_to_integer;

pub use m20250805_000002_change_status_to_integer::STATUS_BACKFILL;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250805_000001_create_users_table::Migration),
            Box::new(m20250805_000002_change_status_to_integer::Migration),
        ]
    }
}

/// Column identifiers shared by the `users` migrations.
#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    Status,
    StatusTemp,
    Hobbies,
    CreatedAt,
    UpdatedAt,
}
