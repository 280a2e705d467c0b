use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::TeacherId;

use super::model::Teacher;

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn get_teachers(db: &PgPool) -> Result<Vec<Teacher>, AppError> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers ORDER BY id",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch teachers")
        .map_err(AppError::internal)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: TeacherId) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM teachers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch teacher by ID")
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher with id {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_seeded_teachers(pool: PgPool) {
        let teachers = TeacherService::get_teachers(&pool).await.unwrap();

        assert_eq!(teachers.len(), 2);
        assert_eq!(teachers[0].last_name, "DELAHAYE");
        assert_eq!(teachers[1].last_name, "THIERCELIN");
        assert!(teachers[0].id < teachers[1].id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_teacher(pool: PgPool) {
        let first = &TeacherService::get_teachers(&pool).await.unwrap()[0];

        let teacher = TeacherService::get_teacher(&pool, first.id).await.unwrap();
        assert_eq!(&teacher, first);

        let err = TeacherService::get_teacher(&pool, TeacherId::new(999_999))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
