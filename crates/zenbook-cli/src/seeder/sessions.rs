//! Fake sessions with random participants.

use anyhow::Context;
use chrono::{Duration, DurationRound, Utc};
use fake::Fake;
use fake::faker::lorem::en::Paragraph;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use std::time::Instant;
use zenbook_models::{SessionId, TeacherId, UserId};

use super::models::{SEED_DESCRIPTION_PREFIX, SessionSeed};

const STYLES: &[&str] = &[
    "Hatha",
    "Vinyasa",
    "Yin",
    "Ashtanga",
    "Restorative",
    "Kundalini",
    "Power",
    "Iyengar",
];

const FORMATS: &[&str] = &[
    "Flow",
    "Basics",
    "Deep Stretch",
    "Morning Practice",
    "Evening Unwind",
    "Workshop",
];

/// Builds `count` sessions spread over the next 60 days.
///
/// Each session gets up to `max_participants` distinct members.
pub fn generate_sessions(
    count: usize,
    teacher_ids: &[TeacherId],
    user_ids: &[UserId],
    max_participants: usize,
) -> Vec<SessionSeed> {
    let mut rng = rand::thread_rng();
    let today = Utc::now()
        .duration_trunc(Duration::hours(1))
        .unwrap_or_else(|_| Utc::now());

    (0..count)
        .filter_map(|_| {
            let teacher_id = *teacher_ids.choose(&mut rng)?;
            let style = STYLES.choose(&mut rng)?;
            let format = FORMATS.choose(&mut rng)?;

            let date = today
                + Duration::days(rng.gen_range(1..=60))
                + Duration::hours(rng.gen_range(7..=20));

            let take = rng.gen_range(0..=max_participants.min(user_ids.len()));
            let mut participants: Vec<UserId> =
                user_ids.choose_multiple(&mut rng, take).copied().collect();
            participants.sort_unstable();

            let paragraph: String = Paragraph(1..3).fake();

            Some(SessionSeed {
                name: format!("{} {}", style, format),
                description: format!("{} {}", SEED_DESCRIPTION_PREFIX, paragraph),
                date,
                teacher_id,
                participants,
            })
        })
        .collect()
}

pub async fn seed_sessions(
    db: &PgPool,
    count: usize,
    user_ids: &[UserId],
    max_participants: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();

    let teacher_ids: Vec<TeacherId> = sqlx::query_scalar("SELECT id FROM teachers ORDER BY id")
        .fetch_all(db)
        .await?;

    if teacher_ids.is_empty() {
        anyhow::bail!("No teachers found. Run `add-teacher` first.");
    }

    println!(
        "📅 Seeding {} sessions (up to {} participants each)...",
        count, max_participants
    );

    let sessions = generate_sessions(count, &teacher_ids, user_ids, max_participants);
    let mut participations = 0;

    let mut tx = db.begin().await?;

    for session in &sessions {
        let id: SessionId = sqlx::query_scalar(
            "INSERT INTO sessions (name, description, date, teacher_id) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&session.name)
        .bind(&session.description)
        .bind(session.date)
        .bind(session.teacher_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert seeded session")?;

        if session.participants.is_empty() {
            continue;
        }

        sqlx::query(
            "INSERT INTO session_participants (session_id, user_id) SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(id)
        .bind(&session.participants)
        .execute(&mut *tx)
        .await
        .context("Failed to insert seeded participants")?;

        participations += session.participants.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} sessions and {} participations in {:?}",
        sessions.len(),
        participations,
        start_time.elapsed()
    );

    Ok(sessions.len())
}

pub async fn clear_sessions(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded sessions...");

    let deleted = sqlx::query("DELETE FROM sessions WHERE description LIKE $1")
        .bind(format!("{}%", SEED_DESCRIPTION_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} sessions in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sessions() {
        let teachers = [TeacherId::new(1), TeacherId::new(2)];
        let users: Vec<UserId> = (1..=30).map(UserId::new).collect();

        let sessions = generate_sessions(15, &teachers, &users, 5);

        assert_eq!(sessions.len(), 15);
        for session in &sessions {
            assert!(teachers.contains(&session.teacher_id));
            assert!(session.name.len() <= 50);
            assert!(session.description.starts_with("[seed] "));
            assert!(session.date > Utc::now());
            assert!(session.participants.len() <= 5);
            assert!(session.participants.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_generate_sessions_without_teachers() {
        let users = [UserId::new(1)];
        assert!(generate_sessions(5, &[], &users, 3).is_empty());
    }

    #[test]
    fn test_participants_capped_by_member_count() {
        let teachers = [TeacherId::new(1)];
        let users = [UserId::new(7), UserId::new(8)];

        for session in generate_sessions(10, &teachers, &users, 10) {
            assert!(session.participants.len() <= 2);
        }
    }
}
