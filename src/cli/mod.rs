//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `migrate` - Database migrations
//! - `seed` - Sample data
//! - `users` - Listing, batch import and attribute introspection

pub mod args;

pub use args::{Cli, Commands};
