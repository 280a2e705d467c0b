//! Database seeding for development and demos.
//!
//! Seeded rows are tagged so `clear_all` removes them without touching real data:
//! members use the `@seed.zenbook.dev` domain and sessions carry a `[seed]`
//! description prefix.

pub mod models;
pub mod sessions;
pub mod users;

use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

/// Seeds members first, then sessions drawing participants from them.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database with {:?}", config);

    let user_ids = users::seed_users(db, config.users).await?;
    sessions::seed_sessions(db, config.sessions, &user_ids, config.max_participants).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    sessions::clear_sessions(db).await?;
    users::clear_users(db).await?;

    println!("\n✅ Seeded data cleared");
    Ok(())
}
