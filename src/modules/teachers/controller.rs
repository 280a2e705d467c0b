use axum::{
    Json,
    extract::State,
};
use tracing::instrument;
use zenbook_core::AppError;
use zenbook_models::TeacherId;

use super::model::Teacher;
use super::service::TeacherService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::PathParam;

/// List all teachers
#[utoipa::path(
    get,
    path = "/api/teachers",
    responses(
        (status = 200, description = "List of teachers", body = Vec<Teacher>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = TeacherService::get_teachers(&state.db).await?;
    Ok(Json(teachers))
}

/// Get a teacher by id
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = i64, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher found", body = Teacher),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_teacher(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    PathParam(id): PathParam<TeacherId>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}
