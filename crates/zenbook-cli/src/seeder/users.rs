//! Fake member accounts.

use anyhow::{Context, anyhow};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use zenbook_core::hash_password;
use zenbook_models::UserId;

use super::models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, UserSeed};

/// Column limit on `users.first_name` and `users.last_name`.
const NAME_MAX: usize = 20;

/// Generates `count` members in parallel. Every member shares `password_hash`.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = seed_email(&first_name, &last_name, idx);

            UserSeed {
                first_name: first_name.chars().take(NAME_MAX).collect(),
                last_name: last_name.chars().take(NAME_MAX).collect(),
                email,
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

fn seed_email(first_name: &str, last_name: &str, idx: usize) -> String {
    let slug = |s: &str| {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .take(12)
            .collect::<String>()
            .to_lowercase()
    };

    format!(
        "{}.{}{}@{}",
        slug(first_name),
        slug(last_name),
        idx,
        SEED_EMAIL_DOMAIN
    )
}

pub async fn seed_users(db: &PgPool, count: usize) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!("🧘 Seeding {} members...", count);

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| anyhow!("Failed to hash password: {}", e.error))?;
    let users = generate_users(count, &password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} members in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts in chunks. Emails already present are skipped.
pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<Vec<UserId>> {
    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<UserId>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (first_name, last_name, email, password) VALUES ");

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash);
    }

    let ids: Vec<UserId> = q
        .fetch_all(&mut **tx)
        .await
        .context("Failed to insert seeded users")?;
    Ok(ids)
}

/// Deletes every account under the seed domain. Their participations go by cascade.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded members...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} members in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
