//! Configuration and row shapes used by the seeder.

use chrono::{DateTime, Utc};
use zenbook_models::{TeacherId, UserId};

/// Domain shared by every seeded account. `clear-seed` deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "seed.zenbook.dev";

/// Prefix marking seeded session descriptions.
pub const SEED_DESCRIPTION_PREFIX: &str = "[seed]";

/// Password given to every seeded member.
pub const SEED_PASSWORD: &str = "namaste123";

pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

pub struct SessionSeed {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub teacher_id: TeacherId,
    pub participants: Vec<UserId>,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub sessions: usize,
    pub max_participants: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 50,
            sessions: 20,
            max_participants: 12,
        }
    }
}

impl SeedConfig {
    pub fn new(users: usize) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn with_sessions(mut self, sessions: usize) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_max_participants(mut self, max_participants: usize) -> Self {
        self.max_participants = max_participants;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SeedConfig::new(10)
            .with_sessions(3)
            .with_max_participants(4);

        assert_eq!(config.users, 10);
        assert_eq!(config.sessions, 3);
        assert_eq!(config.max_participants, 4);
    }
}
