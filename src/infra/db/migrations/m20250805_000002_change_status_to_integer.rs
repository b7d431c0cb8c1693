//! Migration: Store `users.status` as an integer code.
//!
//! Up: add `status_temp` (integer, default 0), backfill it from the string
//! column, drop `status` and rename `status_temp` into its place.
//! Down: the same steps in reverse, back to strings.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::Users;

/// Status mapping as of this migration. Frozen here so later changes to
/// the live declarations cannot rewrite history.
pub const STATUS_BACKFILL: &[(&str, i32)] = &[("active", 0), ("inactive", 1), ("suspended", 3)];

/// Code for unrecognised strings on the way up.
const FALLBACK_CODE: i32 = 0;

/// Symbol for unrecognised codes on the way down.
const FALLBACK_SYMBOL: &str = "active";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The default is part of the column definition: SQLite cannot
        // change a column default after the fact.
        add_status_temp(
            manager,
            ColumnDef::new(Users::StatusTemp)
                .integer()
                .not_null()
                .default(FALLBACK_CODE)
                .to_owned(),
        )
        .await?;

        let mut case = CaseStatement::new();
        for (symbol, code) in STATUS_BACKFILL {
            case = case.case(Expr::col(Users::Status).eq(*symbol), *code);
        }
        backfill(manager, case.finally(FALLBACK_CODE)).await?;

        swap_status_column(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        add_status_temp(
            manager,
            ColumnDef::new(Users::StatusTemp)
                .string()
                .not_null()
                .default(FALLBACK_SYMBOL)
                .to_owned(),
        )
        .await?;

        let mut case = CaseStatement::new();
        for (symbol, code) in STATUS_BACKFILL {
            case = case.case(Expr::col(Users::Status).eq(*code), *symbol);
        }
        backfill(manager, case.finally(FALLBACK_SYMBOL)).await?;

        swap_status_column(manager).await
    }
}

async fn add_status_temp(manager: &SchemaManager<'_>, mut column: ColumnDef) -> Result<(), DbErr> {
    manager
        .alter_table(
            Table::alter()
                .table(Users::Table)
                .add_column(&mut column)
                .to_owned(),
        )
        .await
}

async fn backfill(manager: &SchemaManager<'_>, case: CaseStatement) -> Result<(), DbErr> {
    let update = Query::update()
        .table(Users::Table)
        .value(Users::StatusTemp, case)
        .to_owned();

    let db = manager.get_connection();
    let result = db.execute(db.get_database_backend().build(&update)).await?;
    tracing::info!(rows = result.rows_affected(), "Backfilled users.status_temp");
    Ok(())
}

/// Drop `status`, then rename `status_temp` to `status`.
///
/// Two statements: SQLite accepts one alteration per `ALTER TABLE`.
async fn swap_status_column(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .alter_table(
            Table::alter()
                .table(Users::Table)
                .drop_column(Users::Status)
                .to_owned(),
        )
        .await?;

    manager
        .alter_table(
            Table::alter()
                .table(Users::Table)
                .rename_column(Users::StatusTemp, Users::Status)
                .to_owned(),
        )
        .await
}
