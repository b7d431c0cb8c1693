//! enum-mapped-users - a `users` store whose enumerated attributes are
//! encoded through one mapping table on every write path.
//!
//! `role`, `status` and `hobbies` are declared once in an
//! [`AttributeRegistry`](domain::AttributeRegistry). Single-row creates and
//! updates, batch inserts, batch upserts and seeding all encode through it,
//! so a status written as `"inactive"` is stored as `1` no matter which
//! path wrote it.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Attribute mapper, declarations and the `User` entity
//! - **services**: Use cases (single-row and batch writes, scopes, seeding)
//! - **infra**: Database, migrations and repositories
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load sample users
//! cargo run -- seed
//!
//! # Batch upsert from a JSON file
//! cargo run -- users import rows.json --upsert
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{user_attributes, AttributeRegistry, AttributeValue, NewUser, User, UserRole, UserStatus};
pub use errors::{AppError, AppResult};
