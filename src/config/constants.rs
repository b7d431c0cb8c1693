//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Enumerated attribute names
// =============================================================================

/// Role attribute (positional mapping)
pub const ATTR_ROLE: &str = "role";

/// Status attribute (explicit, non-sequential mapping)
pub const ATTR_STATUS: &str = "status";

/// Hobbies attribute (multiple selection)
pub const ATTR_HOBBIES: &str = "hobbies";

// =============================================================================
// User Roles
// =============================================================================

/// All role values, in declaration order (persisted code = index)
pub const ROLE_VALUES: &[&str] = &["admin", "manager", "employee", "intern"];

/// Default role assigned to new users
pub const DEFAULT_ROLE: &str = "employee";

// =============================================================================
// User Status
// =============================================================================

/// All status values, in declaration order
pub const STATUS_VALUES: &[&str] = &["active", "inactive", "suspended"];

/// Persisted status codes, parallel to `STATUS_VALUES`. Code 2 is reserved.
pub const STATUS_CODES: &[i32] = &[0, 1, 3];

/// Default status assigned to new users
pub const DEFAULT_STATUS: &str = "active";

// =============================================================================
// Hobbies
// =============================================================================

/// All hobby values, in declaration order
pub const HOBBY_VALUES: &[&str] = &["reading", "sports", "cooking", "gaming", "music", "travel"];

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (for development)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db?mode=rwc";

/// In-memory database URL (tests)
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Default connection pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// =============================================================================
// Validation
// =============================================================================

/// Message used for blank required fields
pub const BLANK_MESSAGE: &str = "can't be blank";
