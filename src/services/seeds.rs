//! Sample data for development databases.
//!
//! Seeding is idempotent: users are looked up by email and only created
//! when absent. Existing rows are never overwritten.

use crate::domain::{Hobby, NewUser, UserRole, UserStatus};
use crate::errors::{AppError, AppResult};
use super::UserService;

/// A fixed sample user.
#[derive(Debug, Clone, Copy)]
pub struct SampleUser {
    pub name: &'static str,
    pub email: &'static str,
    pub role: UserRole,
    pub status: UserStatus,
    pub hobbies: &'static [Hobby],
}

impl SampleUser {
    fn to_new_user(self) -> NewUser {
        NewUser::new(self.name, self.email)
            .role(self.role)
            .status(self.status)
            .hobbies(self.hobbies.to_vec())
    }
}

pub const SAMPLE_USERS: &[SampleUser] = &[
    SampleUser {
        name: "John Smith",
        email: "john.smith@example.com",
        role: UserRole::Admin,
        status: UserStatus::Active,
        hobbies: &[Hobby::Reading, Hobby::Travel],
    },
    SampleUser {
        name: "Sarah Johnson",
        email: "sarah.johnson@example.com",
        role: UserRole::Manager,
        status: UserStatus::Active,
        hobbies: &[Hobby::Cooking, Hobby::Music],
    },
    SampleUser {
        name: "Michael Brown",
        email: "michael.brown@example.com",
        role: UserRole::Employee,
        status: UserStatus::Active,
        hobbies: &[Hobby::Sports, Hobby::Gaming],
    },
    SampleUser {
        name: "Emily Davis",
        email: "emily.davis@example.com",
        role: UserRole::Employee,
        status: UserStatus::Inactive,
        hobbies: &[Hobby::Reading, Hobby::Cooking, Hobby::Travel],
    },
    SampleUser {
        name: "David Wilson",
        email: "david.wilson@example.com",
        role: UserRole::Intern,
        status: UserStatus::Active,
        hobbies: &[Hobby::Gaming],
    },
    SampleUser {
        name: "Jennifer Martinez",
        email: "jennifer.martinez@example.com",
        role: UserRole::Manager,
        status: UserStatus::Suspended,
        hobbies: &[Hobby::Music, Hobby::Sports, Hobby::Travel],
    },
];

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
    pub total_users: u64,
}

/// Create every sample user whose email is not yet taken.
pub async fn seed_users(users: &dyn UserService) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for sample in SAMPLE_USERS {
        match users.get_user_by_email(sample.email).await {
            Ok(_) => report.existing += 1,
            Err(AppError::NotFound) => {
                users.create_user(sample.to_new_user()).await?;
                report.created += 1;
            }
            Err(e) => return Err(e),
        }
    }

    report.total_users = users.count_users().await?;
    tracing::info!(
        created = report.created,
        existing = report.existing,
        "Created {} users.",
        report.total_users
    );

    Ok(report)
}
