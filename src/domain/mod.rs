//! Domain layer - Core business entities and logic
//!
//! - `enumerated`: the enumerated attribute mapper (declarations, encode/decode)
//! - `attributes`: the `User` attribute table and typed symbols
//! - `user`: the `User` entity and its write payloads

pub mod attributes;
pub mod enumerated;
pub mod user;

pub use attributes::{user_attributes, Hobby, UserRole, UserStatus};
pub use enumerated::{
    declare, AttributeRegistry, AttributeValue, EnumAttribute, Member, Persisted,
    Representation, Symbolic,
};
pub use user::{NewUser, UpdateUser, User, UserChanges, UserRow};
