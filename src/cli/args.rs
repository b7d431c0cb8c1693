//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// User store with enumerated attributes encoded on every write path
#[derive(Parser, Debug)]
#[command(name = "enum-mapped-users")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Populate the sample users (idempotent)
    Seed,

    /// Query and bulk-load users
    Users(UsersArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// User actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List users, optionally scoped by status
    List {
        /// Status symbols to filter on (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Invert the status filter
        #[arg(long, requires = "statuses")]
        exclude: bool,
    },
    /// Batch-write users from a JSON array of rows
    Import {
        /// Path to the JSON file
        file: PathBuf,

        /// Update rows whose email already exists
        #[arg(long, conflicts_with = "strict")]
        upsert: bool,

        /// Fail the whole batch on a duplicate email instead of skipping it
        #[arg(long)]
        strict: bool,
    },
    /// Show declared enumerated attributes and their codes
    Enums,
}
