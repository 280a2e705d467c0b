use anyhow::{Context, anyhow};
use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::{SessionId, TeacherId, UserId};

use super::model::{Session, SessionDto};
use crate::metrics::{track_participation, track_session_created, track_session_deleted};

/// Session columns plus the aggregated participant ids, sorted ascending.
macro_rules! session_select {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT s.id, s.name, s.description, s.date, s.teacher_id,
                   COALESCE(
                       ARRAY_AGG(sp.user_id ORDER BY sp.user_id)
                           FILTER (WHERE sp.user_id IS NOT NULL),
                       '{}'
                   ) AS users,
                   s.created_at, s.updated_at
            FROM sessions s
            LEFT JOIN session_participants sp ON sp.session_id = s.id
            "#,
            $tail
        )
    };
}

pub struct SessionService;

impl SessionService {
    #[instrument(skip(db))]
    pub async fn get_sessions(db: &PgPool) -> Result<Vec<Session>, AppError> {
        sqlx::query_as::<_, Session>(session_select!("GROUP BY s.id ORDER BY s.date, s.id"))
            .fetch_all(db)
            .await
            .context("Failed to fetch sessions")
            .map_err(AppError::internal)
    }

    #[instrument(skip(db))]
    pub async fn get_session(db: &PgPool, id: SessionId) -> Result<Session, AppError> {
        fetch_session(db, id)
            .await?
            .ok_or_else(|| session_not_found(id))
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_session(db: &PgPool, dto: SessionDto) -> Result<Session, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::internal)?;

        ensure_teacher_exists(&mut tx, dto.teacher_id).await?;
        let users = normalize_ids(dto.users.unwrap_or_default());
        ensure_users_exist(&mut tx, &users).await?;

        let id: SessionId = sqlx::query_scalar(
            r#"
            INSERT INTO sessions (name, description, date, teacher_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.teacher_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert session")
        .map_err(AppError::internal)?;

        replace_participants(&mut tx, id, &users).await?;

        let session = fetch_session(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::internal_error("Created session vanished"))?;

        tx.commit()
            .await
            .context("Failed to commit session")
            .map_err(AppError::internal)?;

        track_session_created();
        tracing::info!(session_id = %session.id, "Session created");

        Ok(session)
    }

    /// Rewrites the session fields. Participants are replaced only when
    /// `dto.users` is present.
    #[instrument(skip(db, dto))]
    pub async fn update_session(
        db: &PgPool,
        id: SessionId,
        dto: SessionDto,
    ) -> Result<Session, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::internal)?;

        let locked: Option<SessionId> =
            sqlx::query_scalar("SELECT id FROM sessions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock session")
                .map_err(AppError::internal)?;

        if locked.is_none() {
            return Err(session_not_found(id));
        }

        ensure_teacher_exists(&mut tx, dto.teacher_id).await?;

        sqlx::query(
            r#"
            UPDATE sessions
            SET name = $2, description = $3, date = $4, teacher_id = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.teacher_id)
        .execute(&mut *tx)
        .await
        .context("Failed to update session")
        .map_err(AppError::internal)?;

        if let Some(users) = dto.users {
            let users = normalize_ids(users);
            ensure_users_exist(&mut tx, &users).await?;
            replace_participants(&mut tx, id, &users).await?;
        }

        let session = fetch_session(&mut *tx, id)
            .await?
            .ok_or_else(|| session_not_found(id))?;

        tx.commit()
            .await
            .context("Failed to commit session update")
            .map_err(AppError::internal)?;

        tracing::info!(session_id = %id, "Session updated");
        Ok(session)
    }

    #[instrument(skip(db))]
    pub async fn delete_session(db: &PgPool, id: SessionId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete session")
            .map_err(AppError::internal)?;

        if result.rows_affected() == 0 {
            return Err(session_not_found(id));
        }

        track_session_deleted();
        tracing::info!(session_id = %id, "Session deleted");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn participate(
        db: &PgPool,
        id: SessionId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if !session_exists(db, id).await? {
            return Err(session_not_found(id));
        }

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(db)
                .await
                .context("Failed to check user")
                .map_err(AppError::internal)?;

        if !user_exists {
            return Err(AppError::not_found(anyhow!(
                "User with id {} not found",
                user_id
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO session_participants (session_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (session_id, user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(|e| match e {
            // Session or user removed since the checks above
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(anyhow!("Session or user no longer exists"))
            }
            other => {
                AppError::internal(anyhow::Error::new(other).context("Failed to add participant"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow!(
                "User {} already participates in session {}",
                user_id,
                id
            )));
        }

        track_participation("join");
        tracing::info!(session_id = %id, user_id = %user_id, "Participant added");
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn no_longer_participate(
        db: &PgPool,
        id: SessionId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if !session_exists(db, id).await? {
            return Err(session_not_found(id));
        }

        let result =
            sqlx::query("DELETE FROM session_participants WHERE session_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(db)
                .await
                .context("Failed to remove participant")
                .map_err(AppError::internal)?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow!(
                "User {} does not participate in session {}",
                user_id,
                id
            )));
        }

        track_participation("leave");
        tracing::info!(session_id = %id, user_id = %user_id, "Participant removed");
        Ok(())
    }
}

fn session_not_found(id: SessionId) -> AppError {
    AppError::not_found(anyhow!("Session with id {} not found", id))
}

fn normalize_ids(mut ids: Vec<UserId>) -> Vec<UserId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn fetch_session<'e, E>(executor: E, id: SessionId) -> Result<Option<Session>, AppError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Session>(session_select!("WHERE s.id = $1 GROUP BY s.id"))
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch session by ID")
        .map_err(AppError::internal)
}

async fn session_exists(db: &PgPool, id: SessionId) -> Result<bool, AppError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to check session")
        .map_err(AppError::internal)
}

async fn ensure_teacher_exists(conn: &mut PgConnection, id: TeacherId) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
        .context("Failed to check teacher")
        .map_err(AppError::internal)?;

    if !exists {
        return Err(AppError::bad_request(anyhow!(
            "Teacher with id {} does not exist",
            id
        )));
    }

    Ok(())
}

/// `ids` must be sorted and free of duplicates.
async fn ensure_users_exist(conn: &mut PgConnection, ids: &[UserId]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: Vec<UserId> =
        sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(conn)
            .await
            .context("Failed to check users")
            .map_err(AppError::internal)?;

    if found.len() == ids.len() {
        return Ok(());
    }

    let missing = ids
        .iter()
        .copied()
        .filter(|id| found.binary_search(id).is_err())
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Err(AppError::bad_request(anyhow!("Unknown user ids: {}", missing)))
}

async fn replace_participants(
    conn: &mut PgConnection,
    id: SessionId,
    users: &[UserId],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM session_participants WHERE session_id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .context("Failed to clear participants")
        .map_err(AppError::internal)?;

    if users.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO session_participants (session_id, user_id)
        SELECT $1, UNNEST($2::bigint[])
        "#,
    )
    .bind(id)
    .bind(users)
    .execute(&mut *conn)
    .await
    .context("Failed to insert participants")
    .map_err(AppError::internal)?;

    Ok(())
}
