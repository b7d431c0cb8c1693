//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod seeds;
mod user_service;

pub use seeds::{seed_users, SampleUser, SeedReport, SAMPLE_USERS};
pub use user_service::{UserManager, UserService};
