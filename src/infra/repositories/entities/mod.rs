//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enumerated columns hold integer codes (or a JSON list for `hobbies`);
//! conversion to symbols happens in [`user::Model::into_user`].

pub mod user;
