use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::UserId;

use super::model::User;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    /// Removes the account. Participant rows go with it through the
    /// `ON DELETE CASCADE` on `session_participants.user_id`.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::internal)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User with id {} not found", id)));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
